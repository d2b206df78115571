//! CLI module for engager - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands to run an engagement
//! session or inspect the resolved configuration.

pub mod commands;

pub use commands::Cli;
