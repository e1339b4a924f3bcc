// Keygate: Top-level error types
//
// Aggregates errors from the backend and auth modules into a single error
// enum for the gateway boundary. Every variant maps to a status code.

use thiserror::Error;

use crate::status::Status;

/// Top-level error type for all Keygate operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    #[error("{0}")]
    Auth(#[from] crate::auth::AuthError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stored record could not be decoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// The status code this error collapses to.
    pub fn status(&self) -> Status {
        match self {
            GatewayError::Backend(e) => e.status(),
            GatewayError::Auth(e) => e.status(),
            GatewayError::InvalidInput(_) | GatewayError::Config(_) => Status::InvalidParameter,
            GatewayError::Json(_) => Status::Decode,
            GatewayError::Io(_) => Status::InternalComponent,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Status::ItemNotFound
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Collapse an operation result into its status code.
pub fn status_of<T>(result: &Result<T>) -> Status {
    match result {
        Ok(_) => Status::Success,
        Err(e) => e.status(),
    }
}
