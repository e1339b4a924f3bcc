// Keygate: Backend error types

use thiserror::Error;

use crate::status::Status;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("No entry for key '{key}' in service '{service}'")]
    NotFound { service: String, key: String },

    #[error("Access to the credential store was denied: {0}")]
    AccessDenied(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid credential attribute: {0}")]
    InvalidInput(String),

    #[error("Stored value is not valid UTF-8")]
    BadEncoding,

    #[error("Keyring error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn status(&self) -> Status {
        match self {
            BackendError::NotFound { .. } => Status::ItemNotFound,
            BackendError::AccessDenied(_) => Status::AccessDenied,
            BackendError::Unavailable(_) => Status::NotAvailable,
            BackendError::InvalidInput(_) => Status::InvalidParameter,
            BackendError::BadEncoding => Status::Decode,
            BackendError::Other(_) => Status::InternalComponent,
        }
    }
}
