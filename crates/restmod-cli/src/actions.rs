//! Action type definitions for CLI commands.

use clap::Subcommand;
use std::path::PathBuf;

/// Configuration file actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write the default configuration to a file
    Init {
        /// Destination (default: ./restmod.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,

    /// Check the effective configuration
    Validate,
}
