// Keygate: CLI Command Handlers
//
// `execute` loads configuration and builds the gateway; `run` dispatches a
// parsed command against any gateway and any I/O pair so the handlers can
// be exercised without a terminal or the OS keyring.

use std::io::{self, BufRead, BufReader, Write};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::CredentialGateway;

use super::{Cli, Commands};

/// Execute the parsed CLI invocation against the configured gateway.
pub fn execute(cli: Cli) -> Result<()> {
    let config = GatewayConfig::load(cli.config.as_deref())?;
    let service = cli.service.unwrap_or_else(|| config.service.clone());
    let gateway = config.build_gateway()?;

    // `Stdin` takes its lock per read, so the terminal prompt can still
    // read its answer while this reader is alive.
    let mut input = BufReader::new(io::stdin());
    let stdout = io::stdout();
    run(&gateway, &service, cli.command, &mut input, &mut stdout.lock())
}

/// Dispatch one command. Secrets read for `set` come from `input`;
/// everything printed goes to `out`. `input` must not hold a lock on a
/// stream the gateway's authenticator also reads.
pub fn run<R: BufRead, W: Write>(
    gateway: &CredentialGateway,
    service: &str,
    command: Commands,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Set { key, value } => cmd_set(gateway, service, &key, value, input, out),
        Commands::Get { key, authenticate } => cmd_get(gateway, service, &key, authenticate, out),
        Commands::Delete { key } => cmd_delete(gateway, service, &key, out),
        Commands::Auth { reason } => cmd_auth(gateway, &reason, out),
        Commands::Describe { code } => {
            writeln!(out, "{}", CredentialGateway::describe(code))?;
            Ok(())
        }
        Commands::Caller => {
            writeln!(out, "{}", gateway.caller_process_name())?;
            Ok(())
        }
    }
}

// ─── Set ─────────────────────────────────────────────────────────────────────

fn cmd_set<R: BufRead, W: Write>(
    gateway: &CredentialGateway,
    service: &str,
    key: &str,
    value: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let value = match value {
        Some(v) => zeroize::Zeroizing::new(v),
        None => read_secret(input)?,
    };

    gateway.store(service, key, &value)?;
    writeln!(out, "✓ Stored '{}' in service '{}'", key, service)?;
    Ok(())
}

/// Read one line from `input`, dropping the line terminator.
fn read_secret<R: BufRead>(input: &mut R) -> Result<zeroize::Zeroizing<String>> {
    let mut line = zeroize::Zeroizing::new(String::new());
    if input.read_line(&mut line)? == 0 {
        return Err(GatewayError::InvalidInput(
            "no value given and standard input is empty".to_string(),
        ));
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

// ─── Get ─────────────────────────────────────────────────────────────────────

fn cmd_get<W: Write>(
    gateway: &CredentialGateway,
    service: &str,
    key: &str,
    authenticate: bool,
    out: &mut W,
) -> Result<()> {
    if authenticate {
        gateway.request_consent(&format!("secret \"{}\" from service \"{}\"", key, service))?;
    }

    let value = gateway.retrieve(service, key)?;
    writeln!(out, "{}", value.as_str())?;
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

fn cmd_delete<W: Write>(
    gateway: &CredentialGateway,
    service: &str,
    key: &str,
    out: &mut W,
) -> Result<()> {
    if gateway.remove(service, key)? {
        writeln!(out, "✓ Deleted '{}' from service '{}'", key, service)?;
    } else {
        writeln!(out, "Nothing stored under '{}' in service '{}'", key, service)?;
    }
    Ok(())
}

// ─── Auth ────────────────────────────────────────────────────────────────────

fn cmd_auth<W: Write>(gateway: &CredentialGateway, reason: &str, out: &mut W) -> Result<()> {
    gateway.authenticate(reason)?;
    writeln!(out, "✓ Authenticated")?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::auth::{PromptAuthenticator, UnsupportedAuthenticator};
    use crate::backend::MemoryBackend;
    use crate::status::Status;

    fn gateway() -> CredentialGateway {
        CredentialGateway::new(Box::new(MemoryBackend::new()), Box::new(UnsupportedAuthenticator))
    }

    fn run_cmd(gw: &CredentialGateway, command: Commands, stdin: &str) -> Result<String> {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        run(gw, "app", command, &mut input, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    /// One input stream handed to both the command and the prompt. A read
    /// while another reader holds the lock fails instead of blocking.
    #[derive(Clone)]
    struct SharedInput(Arc<Mutex<Cursor<Vec<u8>>>>);

    impl SharedInput {
        fn new(data: &str) -> Self {
            Self(Arc::new(Mutex::new(Cursor::new(data.as_bytes().to_vec()))))
        }
    }

    impl Read for SharedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.try_lock() {
                Ok(mut inner) => inner.read(buf),
                Err(_) => Err(io::Error::new(io::ErrorKind::WouldBlock, "input is locked")),
            }
        }
    }

    fn prompt_gateway(input: &SharedInput) -> CredentialGateway {
        CredentialGateway::new(
            Box::new(MemoryBackend::new()),
            Box::new(PromptAuthenticator::with_io(
                BufReader::new(input.clone()),
                io::sink(),
            )),
        )
    }

    fn get(key: &str) -> Commands {
        Commands::Get {
            key: key.to_string(),
            authenticate: false,
        }
    }

    #[test]
    fn test_set_then_get() {
        let gw = gateway();
        let out = run_cmd(
            &gw,
            Commands::Set {
                key: "token".to_string(),
                value: Some("abc123".to_string()),
            },
            "",
        )
        .unwrap();
        assert!(out.contains("token"));

        assert_eq!(run_cmd(&gw, get("token"), "").unwrap(), "abc123\n");
    }

    #[test]
    fn test_set_reads_value_from_stdin() {
        let gw = gateway();
        run_cmd(
            &gw,
            Commands::Set {
                key: "token".to_string(),
                value: None,
            },
            "from-stdin\r\n",
        )
        .unwrap();

        assert_eq!(gw.retrieve("app", "token").unwrap().as_str(), "from-stdin");
    }

    #[test]
    fn test_set_with_empty_stdin_fails() {
        let gw = gateway();
        let err = run_cmd(
            &gw,
            Commands::Set {
                key: "token".to_string(),
                value: None,
            },
            "",
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::InvalidParameter);
    }

    #[test]
    fn test_get_missing_reports_not_found() {
        let err = run_cmd(&gateway(), get("missing"), "").unwrap_err();
        assert_eq!(err.status(), Status::ItemNotFound);
    }

    #[test]
    fn test_get_with_authentication_requires_approval() {
        let gw = gateway();
        gw.store("app", "token", "abc").unwrap();

        let err = run_cmd(
            &gw,
            Commands::Get {
                key: "token".to_string(),
                authenticate: true,
            },
            "",
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::Unimplemented);
    }

    #[test]
    fn test_get_with_approved_authentication() {
        let gw = CredentialGateway::new(
            Box::new(MemoryBackend::new()),
            Box::new(PromptAuthenticator::with_io(
                Cursor::new(b"yes\n".to_vec()),
                io::sink(),
            )),
        );
        gw.store("app", "token", "abc").unwrap();

        let out = run_cmd(
            &gw,
            Commands::Get {
                key: "token".to_string(),
                authenticate: true,
            },
            "",
        )
        .unwrap();
        assert_eq!(out, "abc\n");
    }

    #[test]
    fn test_delete() {
        let gw = gateway();
        gw.store("app", "token", "abc").unwrap();

        let first = run_cmd(&gw, Commands::Delete { key: "token".to_string() }, "").unwrap();
        assert!(first.starts_with('✓'));

        let second = run_cmd(&gw, Commands::Delete { key: "token".to_string() }, "").unwrap();
        assert!(second.starts_with("Nothing stored"));
    }

    #[test]
    fn test_auth_unsupported() {
        let err = run_cmd(
            &gateway(),
            Commands::Auth {
                reason: "test".to_string(),
            },
            "",
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::Unimplemented);
    }

    #[test]
    fn test_auth_prompt_reads_the_command_input_stream() {
        let shared = SharedInput::new("y\n");
        let gw = prompt_gateway(&shared);

        let mut input = BufReader::new(shared);
        let mut out = Vec::new();
        run(
            &gw,
            "app",
            Commands::Auth {
                reason: "unlock".to_string(),
            },
            &mut input,
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "✓ Authenticated\n");
    }

    #[test]
    fn test_get_consent_reads_the_command_input_stream() {
        let shared = SharedInput::new("yes\n");
        let gw = prompt_gateway(&shared);
        gw.store("app", "token", "abc").unwrap();

        let mut input = BufReader::new(shared);
        let mut out = Vec::new();
        run(
            &gw,
            "app",
            Commands::Get {
                key: "token".to_string(),
                authenticate: true,
            },
            &mut input,
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abc\n");
    }

    #[test]
    fn test_held_input_lock_fails_the_prompt() {
        let shared = SharedInput::new("y\n");
        let gw = prompt_gateway(&shared);

        let _held = shared.0.lock().unwrap();
        let err = gw.authenticate("unlock").unwrap_err();
        assert_eq!(err.status(), Status::InternalComponent);
    }

    #[test]
    fn test_describe() {
        let out = run_cmd(&gateway(), Commands::Describe { code: -25300 }, "").unwrap();
        assert_eq!(out, "the specified item could not be found in the keychain\n");

        let out = run_cmd(&gateway(), Commands::Describe { code: 7 }, "").unwrap();
        assert_eq!(out, "unknown status (7)\n");
    }

    #[test]
    fn test_caller() {
        let out = run_cmd(&gateway(), Commands::Caller, "").unwrap();
        assert!(!out.trim().is_empty());
    }
}
