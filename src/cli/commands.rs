//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: log in and engage with the feed (default)
//! - check: validate the configuration and print it with secrets masked

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Engager - paced, rate-limit aware feed engagement
#[derive(Parser, Debug)]
#[command(name = "engager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log in and engage with the feed until interrupted
    Run,

    /// Validate the configuration and print it with the password masked
    Check,
}
