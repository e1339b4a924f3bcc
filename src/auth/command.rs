// Keygate: External Helper Authenticator
//
// Delegates the challenge to a helper program (a polkit agent wrapper, a
// fingerprint helper, a GUI confirm dialog). The reason is passed as the
// last argument and in KEYGATE_AUTH_REASON. The helper's exit status is
// the verdict: 0 approves, 1 denies, death by signal cancels.

use std::io;
use std::process::{Command, Stdio};

use super::{AuthError, Authenticator};

/// Environment variable carrying the reason to the helper.
pub const REASON_ENV: &str = "KEYGATE_AUTH_REASON";

#[derive(Debug, Clone)]
pub struct CommandAuthenticator {
    program: String,
    args: Vec<String>,
}

impl CommandAuthenticator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from an argv-style list; the first element is the program.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl Authenticator for CommandAuthenticator {
    fn name(&self) -> &'static str {
        "command"
    }

    fn authenticate(&self, reason: &str) -> Result<(), AuthError> {
        tracing::debug!(program = %self.program, "Running authentication helper");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(reason)
            .env(REASON_ENV, reason)
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    AuthError::Unsupported(format!(
                        "cannot run helper '{}': {}",
                        self.program, e
                    ))
                }
                _ => AuthError::Failed(format!("helper '{}' failed to start: {}", self.program, e)),
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(1) => Err(AuthError::Denied),
            Some(code) => Err(AuthError::Failed(format!(
                "helper '{}' exited with status {}",
                self.program, code
            ))),
            // No exit code: the helper was killed, e.g. the dialog was torn down.
            None => Err(AuthError::Cancelled),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandAuthenticator {
        CommandAuthenticator::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_exit_zero_approves() {
        assert!(sh("exit 0").authenticate("reason").is_ok());
    }

    #[test]
    fn test_exit_one_denies() {
        let err = sh("exit 1").authenticate("reason").unwrap_err();
        assert!(matches!(err, AuthError::Denied));
    }

    #[test]
    fn test_other_exit_fails() {
        let err = sh("exit 3").authenticate("reason").unwrap_err();
        assert!(matches!(err, AuthError::Failed(_)));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_killed_helper_cancels() {
        let err = sh("kill -9 $$").authenticate("reason").unwrap_err();
        assert!(matches!(err, AuthError::Cancelled));
    }

    #[test]
    fn test_missing_helper_is_unsupported() {
        let auth = CommandAuthenticator::new("/nonexistent/keygate-helper", vec![]);
        let err = auth.authenticate("reason").unwrap_err();
        assert!(matches!(err, AuthError::Unsupported(_)));
    }

    #[test]
    fn test_reason_reaches_helper() {
        let auth = sh(r#"test "$KEYGATE_AUTH_REASON" = "unlock vault" && test "$0" = "unlock vault""#);
        assert!(auth.authenticate("unlock vault").is_ok());
    }

    #[test]
    fn test_from_argv() {
        assert!(CommandAuthenticator::from_argv(&[]).is_none());

        let argv = vec!["sh".to_string(), "-c".to_string(), "exit 0".to_string()];
        let auth = CommandAuthenticator::from_argv(&argv).unwrap();
        assert!(auth.authenticate("r").is_ok());
    }
}
