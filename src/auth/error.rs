// Keygate: Authentication error types

use thiserror::Error;

use crate::status::Status;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication denied")]
    Denied,

    #[error("Authentication cancelled by user")]
    Cancelled,

    #[error("Authentication is not available: {0}")]
    Unsupported(String),

    #[error("Authentication failed: {0}")]
    Failed(String),
}

impl AuthError {
    pub fn status(&self) -> Status {
        match self {
            AuthError::Denied => Status::AccessDenied,
            AuthError::Cancelled => Status::UserCancelled,
            AuthError::Unsupported(_) => Status::Unimplemented,
            AuthError::Failed(_) => Status::InternalComponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_and_unsupported_are_distinct() {
        let cancelled = AuthError::Cancelled.status();
        let unsupported = AuthError::Unsupported("none".to_string()).status();
        let denied = AuthError::Denied.status();

        assert_ne!(cancelled, unsupported);
        assert_ne!(cancelled, denied);
        assert_ne!(denied, unsupported);
    }
}
