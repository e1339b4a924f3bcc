// Keygate: Configuration
//
// Settings come from a TOML file (default `<config dir>/keygate/config.toml`)
// and are then overridden by KEYGATE_* environment variables. A missing
// default file means defaults; an explicitly named file must exist.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::auth::{Authenticator, CommandAuthenticator, PromptAuthenticator, UnsupportedAuthenticator};
use crate::backend::{CredentialBackend, KeyringBackend, MemoryBackend};
use crate::error::{GatewayError, Result};
use crate::gateway::CredentialGateway;

/// Service namespace used when none is configured.
pub const DEFAULT_SERVICE: &str = "io.keygate";

pub const ENV_SERVICE: &str = "KEYGATE_SERVICE";
pub const ENV_BACKEND: &str = "KEYGATE_BACKEND";
pub const ENV_AUTH_MODE: &str = "KEYGATE_AUTH_MODE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Service namespace for CLI operations.
    pub service: String,
    pub backend: BackendKind,
    pub auth: AuthConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            backend: BackendKind::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Keyring,
    Memory,
}

impl FromStr for BackendKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(BackendKind::Keyring),
            "memory" => Ok(BackendKind::Memory),
            other => Err(GatewayError::Config(format!(
                "unknown backend '{}' (expected 'keyring' or 'memory')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Helper argv for `mode = "command"`; the reason is appended.
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Prompt,
    Command,
    Unsupported,
}

impl FromStr for AuthMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prompt" => Ok(AuthMode::Prompt),
            "command" => Ok(AuthMode::Command),
            "unsupported" => Ok(AuthMode::Unsupported),
            other => Err(GatewayError::Config(format!(
                "unknown auth mode '{}' (expected 'prompt', 'command' or 'unsupported')",
                other
            ))),
        }
    }
}

impl GatewayConfig {
    /// `<config dir>/keygate/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("keygate").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Apply KEYGATE_* overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(service) = lookup(ENV_SERVICE) {
            self.service = service;
        }
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(mode) = lookup(ENV_AUTH_MODE) {
            self.auth.mode = mode.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.is_empty() {
            return Err(GatewayError::Config("service must not be empty".to_string()));
        }
        if self.auth.mode == AuthMode::Command && self.auth.command.is_empty() {
            return Err(GatewayError::Config(
                "auth.mode = \"command\" requires auth.command".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a gateway wired to the configured backend and authenticator.
    pub fn build_gateway(&self) -> Result<CredentialGateway> {
        let backend: Box<dyn CredentialBackend> = match self.backend {
            BackendKind::Keyring => {
                let keyring = KeyringBackend::new();
                if !keyring.is_durable() {
                    tracing::warn!("Platform keyring does not persist items; they will be lost");
                }
                Box::new(keyring)
            }
            BackendKind::Memory => Box::new(MemoryBackend::new()),
        };

        let authenticator: Box<dyn Authenticator> = match self.auth.mode {
            AuthMode::Prompt => Box::new(PromptAuthenticator::terminal()),
            AuthMode::Command => Box::new(
                CommandAuthenticator::from_argv(&self.auth.command).ok_or_else(|| {
                    GatewayError::Config("auth.command must name a program".to_string())
                })?,
            ),
            AuthMode::Unsupported => Box::new(UnsupportedAuthenticator),
        };

        Ok(CredentialGateway::new(backend, authenticator))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
