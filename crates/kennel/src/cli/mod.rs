//! Command-line interface for kennel.
//!
//! This module provides the CLI structure for the `kennel` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, ExportCommand, ListCommand,
    StatusCommand,
};

use crate::logging::Verbosity;

/// kennel - Keep a list of dogs
///
/// Records are stored locally and saved after every change.
#[derive(Debug, Parser)]
#[command(name = "kennel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a dog to the end of the list
    Add(AddCommand),

    /// Show all dogs
    List(ListCommand),

    /// Remove dogs by position
    Delete(DeleteCommand),

    /// Remove every dog and the stored list
    Clear(ClearCommand),

    /// Print the stored encoding
    Export(ExportCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
