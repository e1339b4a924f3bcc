// Keygate: CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: set, get, delete, auth, describe, caller.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{execute, run};

/// Keygate: store and fetch secrets in the platform credential store.
#[derive(Parser, Debug)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: <config dir>/keygate/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service namespace; overrides the configured one.
    #[arg(long, global = true)]
    pub service: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a secret, replacing any existing value.
    Set {
        /// The key identifying the secret within the service.
        key: String,

        /// The secret value. Read from stdin when omitted, which keeps it
        /// out of shell history.
        #[arg(long)]
        value: Option<String>,
    },

    /// Print a stored secret.
    Get {
        /// The key identifying the secret within the service.
        key: String,

        /// Ask the user to approve the release first.
        #[arg(long)]
        authenticate: bool,
    },

    /// Delete a stored secret.
    Delete {
        /// The key identifying the secret within the service.
        key: String,
    },

    /// Run the user authentication challenge.
    Auth {
        /// Text shown to the user explaining the request.
        reason: String,
    },

    /// Explain a status code.
    Describe {
        /// The status code, e.g. -25300.
        #[arg(allow_hyphen_values = true)]
        code: i32,
    },

    /// Print the name of the process that invoked keygate.
    Caller,
}
