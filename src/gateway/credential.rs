// Keygate: Credential Gateway
//
// Pass-through adapter from (service, key, value) requests to a
// `CredentialBackend`. The gateway itself holds no mutable state; the
// backend is the only thing that persists, and it serializes its own writes.
//
// Secret values never appear in log fields.

use std::borrow::Cow;

use zeroize::Zeroizing;

use crate::auth::Authenticator;
use crate::backend::CredentialBackend;
use crate::error::{GatewayError, Result};
use crate::process::{caller_process_name, process_name, CallerInfo};
use crate::status;

pub struct CredentialGateway {
    backend: Box<dyn CredentialBackend>,
    authenticator: Box<dyn Authenticator>,
}

impl CredentialGateway {
    pub fn new(backend: Box<dyn CredentialBackend>, authenticator: Box<dyn Authenticator>) -> Self {
        Self {
            backend,
            authenticator,
        }
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Persist `value` under (service, key), overwriting any existing entry.
    pub fn store(&self, service: &str, key: &str, value: &str) -> Result<()> {
        validate_identifier("service", service)?;
        validate_identifier("key", key)?;

        self.backend
            .set_item(service, key, value)
            .inspect_err(|e| self.log_failure("store", service, key, e.status().code()))?;

        tracing::info!(service, key, backend = self.backend.name(), "Credential stored");
        Ok(())
    }

    /// Look up the value for (service, key). The returned buffer is wiped
    /// when dropped.
    pub fn retrieve(&self, service: &str, key: &str) -> Result<Zeroizing<String>> {
        validate_identifier("service", service)?;
        validate_identifier("key", key)?;

        let value = self
            .backend
            .get_item(service, key)
            .inspect_err(|e| self.log_failure("retrieve", service, key, e.status().code()))?;

        tracing::debug!(service, key, backend = self.backend.name(), "Credential retrieved");
        Ok(value)
    }

    /// Delete the entry for (service, key). Returns whether it existed.
    pub fn remove(&self, service: &str, key: &str) -> Result<bool> {
        validate_identifier("service", service)?;
        validate_identifier("key", key)?;

        let existed = self
            .backend
            .delete_item(service, key)
            .inspect_err(|e| self.log_failure("remove", service, key, e.status().code()))?;

        if existed {
            tracing::info!(service, key, backend = self.backend.name(), "Credential deleted");
        }
        Ok(existed)
    }

    /// Challenge the user, showing `reason`. Blocks until they answer.
    pub fn authenticate(&self, reason: &str) -> Result<()> {
        match self.authenticator.authenticate(reason) {
            Ok(()) => {
                tracing::debug!(authenticator = self.authenticator.name(), "User approved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    authenticator = self.authenticator.name(),
                    status = e.status().code(),
                    "Authentication did not succeed: {}",
                    e
                );
                Err(GatewayError::Auth(e))
            }
        }
    }

    /// Ask the user to release `subject` to the calling process.
    pub fn request_consent(&self, subject: &str) -> Result<()> {
        let caller = CallerInfo::parent();
        if let Ok(info) = &caller {
            tracing::info!(actor = %info.actor_string(), subject, "Consent requested");
        }

        let reason = format!("give {} to process \"{}\"", subject, process_name(&caller));
        self.authenticate(&reason)
    }

    /// Human-readable text for any status code. Never fails.
    pub fn describe(code: i32) -> Cow<'static, str> {
        status::describe(code)
    }

    /// Name of the process that invoked the gateway, queried fresh.
    pub fn caller_process_name(&self) -> String {
        caller_process_name()
    }

    fn log_failure(&self, op: &str, service: &str, key: &str, code: i32) {
        tracing::debug!(
            op,
            service,
            key,
            backend = self.backend.name(),
            status = code,
            "Backend request failed: {}",
            status::describe(code)
        );
    }
}

fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GatewayError::InvalidInput(format!("{} must not be empty", field)));
    }
    if value.contains('\0') {
        return Err(GatewayError::InvalidInput(format!(
            "{} must not contain NUL bytes",
            field
        )));
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
