// Keygate: Library root
//
// Re-exports the gateway and its backend, auth, process, store, config and
// CLI modules.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod process;
pub mod status;
pub mod store;

pub use error::{GatewayError, Result};
pub use gateway::CredentialGateway;
pub use status::{describe, Status};
