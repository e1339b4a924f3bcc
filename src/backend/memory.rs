// Keygate: In-Memory Backend
//
// Keeps secrets in a process-local map. Nothing survives the process, so
// this backend is for tests and sessions that must not touch the OS store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use zeroize::Zeroizing;

use super::{BackendError, CredentialBackend};

type Items = HashMap<(String, String), Zeroizing<String>>;

/// A backend that stores entries in memory. Writes to the same pair are
/// serialized by the internal mutex.
#[derive(Default)]
pub struct MemoryBackend {
    items: Mutex<Items>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all services.
    pub fn len(&self) -> Result<usize, BackendError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Items>, BackendError> {
        self.items
            .lock()
            .map_err(|_| BackendError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl CredentialBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn set_item(&self, service: &str, key: &str, value: &str) -> Result<(), BackendError> {
        let mut items = self.lock()?;
        items.insert(
            (service.to_string(), key.to_string()),
            Zeroizing::new(value.to_string()),
        );
        Ok(())
    }

    fn get_item(&self, service: &str, key: &str) -> Result<Zeroizing<String>, BackendError> {
        let items = self.lock()?;
        items
            .get(&(service.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::NotFound {
                service: service.to_string(),
                key: key.to_string(),
            })
    }

    fn delete_item(&self, service: &str, key: &str) -> Result<bool, BackendError> {
        let mut items = self.lock()?;
        Ok(items
            .remove(&(service.to_string(), key.to_string()))
            .is_some())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_set_then_get_returns_value() {
        let backend = MemoryBackend::new();
        backend.set_item("app", "token", "abc123").unwrap();
        assert_eq!(backend.get_item("app", "token").unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_missing_item_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.get_item("app", "missing").unwrap_err();
        assert_eq!(err.status(), Status::ItemNotFound);
    }

    #[test]
    fn test_services_are_separate_namespaces() {
        let backend = MemoryBackend::new();
        backend.set_item("a", "key", "one").unwrap();
        backend.set_item("b", "key", "two").unwrap();

        assert_eq!(backend.get_item("a", "key").unwrap().as_str(), "one");
        assert_eq!(backend.get_item("b", "key").unwrap().as_str(), "two");
        assert_eq!(backend.len().unwrap(), 2);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let backend = MemoryBackend::new();
        backend.set_item("app", "key", "first").unwrap();
        backend.set_item("app", "key", "second").unwrap();

        assert_eq!(backend.len().unwrap(), 1);
        assert_eq!(backend.get_item("app", "key").unwrap().as_str(), "second");
    }

    #[test]
    fn test_delete_reports_existence() {
        let backend = MemoryBackend::new();
        backend.set_item("app", "key", "v").unwrap();

        assert!(backend.delete_item("app", "key").unwrap());
        assert!(!backend.delete_item("app", "key").unwrap());
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_not_available() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        backend.set_item("app", "key", "v").unwrap();

        let poisoner = backend.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.items.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert_eq!(backend.len().unwrap_err().status(), Status::NotAvailable);
        assert_eq!(backend.is_empty().unwrap_err().status(), Status::NotAvailable);
        assert_eq!(
            backend.get_item("app", "key").unwrap_err().status(),
            Status::NotAvailable
        );
    }
}
