// Keygate: Authentication Module
//
// User-consent challenges. The gateway only sees the `Authenticator` trait;
// concrete challenges are a terminal prompt, an external helper program
// (polkit agent, biometric helper, ...) or a stub for platforms without one.

mod command;
mod error;
mod prompt;

pub use command::CommandAuthenticator;
pub use error::AuthError;
pub use prompt::PromptAuthenticator;

/// Asks the user to approve an operation.
///
/// Implementations block until the user answers. Approval is `Ok(())`;
/// denial, cancellation and missing platform support are distinct errors.
pub trait Authenticator {
    /// Short identifier used in log fields.
    fn name(&self) -> &'static str;

    /// Run the challenge, showing `reason` to the user where possible.
    fn authenticate(&self, reason: &str) -> Result<(), AuthError>;
}

/// Authenticator for environments with no way to challenge the user.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedAuthenticator;

impl Authenticator for UnsupportedAuthenticator {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn authenticate(&self, _reason: &str) -> Result<(), AuthError> {
        Err(AuthError::Unsupported(
            "no authentication facility is configured".to_string(),
        ))
    }
}
