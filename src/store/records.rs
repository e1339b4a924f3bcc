// Keygate: Record Store
//
// Stores serde values (tokens, cached session credentials, client
// registrations) as JSON secrets. A missing record reads as `None` rather
// than an error, since "not cached yet" is the normal first-run state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::gateway::CredentialGateway;

/// Key under which a record of `kind` named `name` is stored.
pub fn record_key(kind: &str, name: &str) -> String {
    format!("{}:{}", kind, name)
}

pub struct RecordStore<'a> {
    gateway: &'a CredentialGateway,
    service: String,
}

impl<'a> RecordStore<'a> {
    pub fn new(gateway: &'a CredentialGateway, service: impl Into<String>) -> Self {
        Self {
            gateway,
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Load a record. `Ok(None)` when nothing is stored under the key.
    pub fn get<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<Option<T>> {
        let key = record_key(kind, name);
        let raw = match self.gateway.retrieve(&self.service, &key) {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }

    /// Serialize and store a record, replacing any previous one.
    pub fn set<T: Serialize>(&self, kind: &str, name: &str, value: &T) -> Result<()> {
        let key = record_key(kind, name);
        let json = Zeroizing::new(serde_json::to_string(value)?);
        self.gateway.store(&self.service, &key, &json)
    }

    /// Delete a record. Returns whether it existed.
    pub fn remove(&self, kind: &str, name: &str) -> Result<bool> {
        self.gateway.remove(&self.service, &record_key(kind, name))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
