// Keygate: Backend Module
//
// Platform-native secret storage behind one trait. The OS keyring backend
// (Keychain/Credential Manager/Secret Service) is the production path; the
// in-memory backend serves tests and throwaway sessions.

mod error;
mod memory;
mod provider;

pub use error::BackendError;
pub use memory::MemoryBackend;
pub use provider::{CredentialBackend, KeyringBackend};
