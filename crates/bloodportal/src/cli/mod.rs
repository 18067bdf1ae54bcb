//! Command-line interface for bloodportal.
//!
//! This module provides the CLI structure for the `bloodportal` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddDonationArgs, AddDonorArgs, ConfigCommand, DashboardCommand, DonationCommand,
    DonorCommand, OutputFormat,
};

/// bloodportal - Record blood donors and their donations
///
/// Talks to a blood donation API: lists donors and donations, registers
/// donors, records donations, and deletes donors.
#[derive(Debug, Parser)]
#[command(name = "bloodportal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides configuration and BLOODPORTAL_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

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
    /// Show donors, donations and donor choices together
    Dashboard(DashboardCommand),

    /// List, add or delete donors
    #[command(subcommand)]
    Donors(DonorCommand),

    /// List or record donations
    #[command(subcommand)]
    Donations(DonationCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
