// Keygate: Application Entry Point
//
// Parses CLI arguments, initializes structured logging on stderr (stdout is
// reserved for command output such as retrieved secrets), and dispatches to
// the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keygate::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins when set; otherwise -v raises the default from warn to debug.
    let default_filter = if cli.verbose { "keygate=debug" } else { "keygate=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {} (status {})", e, e.status().code());
        std::process::exit(1);
    }
}
