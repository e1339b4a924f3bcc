// Keygate: Terminal Prompt Authenticator
//
// Shows the reason and asks a yes/no question. End of input (Ctrl-D)
// cancels; anything but an explicit yes denies.

use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::sync::Mutex;

use super::{AuthError, Authenticator};

type Input = Box<dyn BufRead + Send>;
type Output = Box<dyn Write + Send>;

pub struct PromptAuthenticator {
    input: Mutex<Input>,
    output: Mutex<Output>,
    require_tty: bool,
}

impl PromptAuthenticator {
    /// Prompt on the controlling terminal (question on stderr, answer on
    /// stdin). Reports `Unsupported` when stdin is not a TTY.
    pub fn terminal() -> Self {
        Self {
            input: Mutex::new(Box::new(BufReader::new(io::stdin()))),
            output: Mutex::new(Box::new(io::stderr())),
            require_tty: true,
        }
    }

    /// Prompt over arbitrary streams.
    pub fn with_io<R, W>(input: R, output: W) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
            require_tty: false,
        }
    }

    fn ask(&self, reason: &str) -> Result<(), AuthError> {
        {
            let mut out = self
                .output
                .lock()
                .map_err(|_| AuthError::Failed("prompt output lock poisoned".to_string()))?;
            write!(out, "Authorization requested: {}\nAllow? [y/N] ", reason).map_err(io_failure)?;
            out.flush().map_err(io_failure)?;
        }

        let mut answer = String::new();
        let read = {
            let mut input = self
                .input
                .lock()
                .map_err(|_| AuthError::Failed("prompt input lock poisoned".to_string()))?;
            input.read_line(&mut answer)
        };

        match read {
            Ok(0) => Err(AuthError::Cancelled),
            Ok(_) => match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(AuthError::Denied),
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(AuthError::Cancelled),
            Err(e) => Err(io_failure(e)),
        }
    }
}

impl Authenticator for PromptAuthenticator {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn authenticate(&self, reason: &str) -> Result<(), AuthError> {
        if self.require_tty && !io::stdin().is_terminal() {
            return Err(AuthError::Unsupported(
                "standard input is not a terminal".to_string(),
            ));
        }
        self.ask(reason)
    }
}

fn io_failure(e: io::Error) -> AuthError {
    AuthError::Failed(format!("prompt I/O error: {}", e))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
