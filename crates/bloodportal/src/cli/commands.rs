//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::portal::{DonationForm, DonorForm};

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Donor commands.
#[derive(Debug, Subcommand)]
pub enum DonorCommand {
    /// List all donors
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the donor choices for recording a donation
    Options,

    /// Register a new donor
    Add(AddDonorArgs),

    /// Delete a donor by id (no confirmation)
    Delete {
        /// Donor id, as shown in the ID column
        id: String,
    },
}

/// Fields of the "Add Donor" form.
#[derive(Debug, Args)]
pub struct AddDonorArgs {
    /// Donor name
    #[arg(short, long)]
    pub name: String,

    /// Blood group (e.g. A+)
    #[arg(short, long)]
    pub blood_group: String,

    /// Phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,
}

impl From<AddDonorArgs> for DonorForm {
    fn from(args: AddDonorArgs) -> Self {
        Self {
            name: args.name,
            blood_group: args.blood_group,
            phone: args.phone.unwrap_or_default(),
            email: args.email.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
        }
    }
}

/// Donation commands.
#[derive(Debug, Subcommand)]
pub enum DonationCommand {
    /// List all donations
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Record a donation
    Add(AddDonationArgs),
}

/// Fields of the "Record Donation" form.
#[derive(Debug, Args)]
pub struct AddDonationArgs {
    /// Id of the donor who gave (see `donors options`)
    #[arg(short, long)]
    pub donor: String,

    /// Quantity in units
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,

    /// Date of the donation (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Location
    #[arg(short, long)]
    pub location: Option<String>,

    /// Notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<AddDonationArgs> for DonationForm {
    fn from(args: AddDonationArgs) -> Self {
        Self {
            donor_id: args.donor,
            quantity: args.quantity,
            date: Some(args.date),
            location: args.location.unwrap_or_default(),
            notes: args.notes.unwrap_or_default(),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
