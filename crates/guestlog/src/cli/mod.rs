//! Command-line interface for guestlog.
//!
//! This module provides the CLI structure and output rendering for the
//! `guestlog` binary, the terminal front end of a front-desk kiosk.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, ExportCommand, ListCommand, OutputFormat, ReasonArg,
    SignInCommand, SignOutCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// guestlog - front-desk guest sign-in log
///
/// Records guests signing in and out on this device. Visits left open are
/// closed automatically after a fixed number of hours.
#[derive(Debug, Parser)]
#[command(name = "guestlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
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
    /// Sign a guest in
    SignIn(SignInCommand),

    /// Sign a guest out by name
    SignOut(SignOutCommand),

    /// List visits, newest first
    List(ListCommand),

    /// Export every visit as CSV
    Export(ExportCommand),

    /// Delete every visit
    Clear(ClearCommand),

    /// Show log counts and storage location
    Status(StatusCommand),

    /// View or validate configuration
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
