pub mod config;
pub mod schema;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "winsvc")]
#[command(about = "Declaratively manage Windows services.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get, set, delete or export service configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the JSON schema of the accepted service document
    Schema,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Retrieve the configuration of one service
    Get {
        /// Service document as JSON, at least `{"name": ...}`
        #[arg(short, long)]
        input: String,
    },
    /// Create or update a service
    Set {
        /// Service document as JSON, at least `{"name": ..., "path": ...}`
        #[arg(short, long)]
        input: String,
        /// Report what would change without applying it
        #[arg(short, long)]
        what_if: bool,
    },
    /// Stop and remove a service
    Delete {
        /// Service document as JSON, at least `{"name": ...}`
        #[arg(short, long)]
        input: String,
        /// Report what would be deleted without deleting it
        #[arg(short, long)]
        what_if: bool,
    },
    /// List every service with its configuration
    Export {
        /// Accepted for symmetry with the other actions and ignored
        #[arg(short, long)]
        input: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
