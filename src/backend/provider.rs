// Keygate: Credential Backend
//
// The one polymorphic boundary between the gateway and a platform secret
// store. Each backend stores at most one value per (service, key) pair and
// overwrites on set.
//
// Production dispatch through the `keyring` crate:
//   - macOS: Security.framework Keychain
//   - Windows: Windows Credential Manager
//   - Linux: D-Bus Secret Service, cached in kernel keyutils

use keyring::credential::{CredentialBuilderApi, CredentialPersistence};
use zeroize::Zeroizing;

use super::BackendError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a secure store, enabling platform backends and
/// in-memory implementations for testing.
pub trait CredentialBackend {
    /// Short identifier used in log fields.
    fn name(&self) -> &'static str;

    /// Store `value` under (service, key), replacing any existing entry.
    fn set_item(&self, service: &str, key: &str, value: &str) -> Result<(), BackendError>;

    /// Fetch the value for (service, key). A missing entry is `NotFound`.
    fn get_item(&self, service: &str, key: &str) -> Result<Zeroizing<String>, BackendError>;

    /// Delete the entry. Returns false if there was nothing to delete.
    fn delete_item(&self, service: &str, key: &str) -> Result<bool, BackendError>;
}

// ─── Platform Implementation ─────────────────────────────────────────────────

/// Production backend using the `keyring` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringBackend;

impl KeyringBackend {
    pub fn new() -> Self {
        Self
    }

    /// Whether the platform store keeps items until they are deleted.
    /// False for stores that forget on reboot or process exit.
    pub fn is_durable(&self) -> bool {
        matches!(
            keyring::default::default_credential_builder().persistence(),
            CredentialPersistence::UntilDelete
        )
    }

    fn entry(service: &str, key: &str) -> Result<keyring::Entry, BackendError> {
        keyring::Entry::new(service, key).map_err(|e| map_keyring_error(e, service, key))
    }
}

impl CredentialBackend for KeyringBackend {
    fn name(&self) -> &'static str {
        "keyring"
    }

    fn set_item(&self, service: &str, key: &str, value: &str) -> Result<(), BackendError> {
        let entry = Self::entry(service, key)?;
        entry
            .set_password(value)
            .map_err(|e| map_keyring_error(e, service, key))?;
        tracing::debug!(service, key, "Item written to platform keyring");
        Ok(())
    }

    fn get_item(&self, service: &str, key: &str) -> Result<Zeroizing<String>, BackendError> {
        let entry = Self::entry(service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Zeroizing::new(value)),
            Err(e) => Err(map_keyring_error(e, service, key)),
        }
    }

    fn delete_item(&self, service: &str, key: &str) -> Result<bool, BackendError> {
        let entry = Self::entry(service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => {
                tracing::debug!(service, key, "No keyring item to delete");
                Ok(false)
            }
            Err(e) => Err(map_keyring_error(e, service, key)),
        }
    }
}

/// Fold keyring's error space into the gateway's status taxonomy.
fn map_keyring_error(err: keyring::Error, service: &str, key: &str) -> BackendError {
    match err {
        keyring::Error::NoEntry => BackendError::NotFound {
            service: service.to_string(),
            key: key.to_string(),
        },
        keyring::Error::NoStorageAccess(e) => BackendError::AccessDenied(e.to_string()),
        keyring::Error::PlatformFailure(e) => BackendError::Unavailable(e.to_string()),
        keyring::Error::BadEncoding(_) => BackendError::BadEncoding,
        keyring::Error::TooLong(attr, limit) => BackendError::InvalidInput(format!(
            "'{}' exceeds the platform limit of {} characters",
            attr, limit
        )),
        keyring::Error::Invalid(attr, reason) => {
            BackendError::InvalidInput(format!("'{}' is invalid: {}", attr, reason))
        }
        other => BackendError::Other(other.to_string()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
