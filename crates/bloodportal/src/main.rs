//! `bloodportal` - CLI for the blood donation portal
//!
//! Each subcommand loads the relevant lists from the API, applies at most one
//! write, and prints the status message and the refreshed table.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use bloodportal::cli::{
    Cli, Command, ConfigCommand, DashboardCommand, DonationCommand, DonorCommand, OutputFormat,
};
use bloodportal::render::{self, Snapshot};
use bloodportal::{init_logging, Config, HttpApi, Portal};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let Cli {
        config,
        api_url,
        command,
        ..
    } = cli;

    // Config commands must work without a valid API client.
    match command {
        Command::Config(cmd) => handle_config(config, api_url, cmd),
        Command::Dashboard(cmd) => dashboard(&mut connect(config, api_url)?, cmd).await,
        Command::Donors(cmd) => donors(&mut connect(config, api_url)?, cmd).await,
        Command::Donations(cmd) => donations(&mut connect(config, api_url)?, cmd).await,
    }
}

fn load_config(path: Option<PathBuf>, api_url: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load_from(path).context("loading configuration")?;
    if let Some(url) = api_url {
        config = config.with_base_url(url).context("applying --api-url")?;
    }
    Ok(config)
}

fn connect(path: Option<PathBuf>, api_url: Option<String>) -> anyhow::Result<Portal<HttpApi>> {
    let config = load_config(path, api_url)?;
    let api = HttpApi::new(&config.api).context("building API client")?;
    Ok(Portal::new(api))
}

async fn dashboard(
    portal: &mut Portal<HttpApi>,
    cmd: DashboardCommand,
) -> anyhow::Result<ExitCode> {
    portal.load().await;
    match cmd.format {
        OutputFormat::Json => print_json(&Snapshot {
            message: portal.message(),
            donors: Some(portal.donors()),
            donations: Some(portal.donations()),
        })?,
        OutputFormat::Table => {
            println!("Donors");
            print!("{}", render::donor_table(portal.donors()));
            println!();
            println!("Donations");
            print!("{}", render::donation_table(portal.donations()));
            println!();
            println!("Record Donation");
            print!("{}", render::donor_selector(&portal.donor_options()));
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn donors(portal: &mut Portal<HttpApi>, cmd: DonorCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        DonorCommand::List { format } => {
            portal.refresh_donors().await;
            print_donors(portal, format)?;
            Ok(ExitCode::SUCCESS)
        }
        DonorCommand::Options => {
            portal.refresh_donors().await;
            print!("{}", render::donor_selector(&portal.donor_options()));
            Ok(ExitCode::SUCCESS)
        }
        DonorCommand::Add(args) => {
            *portal.donor_form_mut() = args.into();
            let result = portal.create_donor().await;
            finish_write(portal, result, |p| print_donors(p, OutputFormat::Table))
        }
        DonorCommand::Delete { id } => {
            let result = portal.delete_donor(&id).await;
            finish_write(portal, result, |p| print_donors(p, OutputFormat::Table))
        }
    }
}

async fn donations(
    portal: &mut Portal<HttpApi>,
    cmd: DonationCommand,
) -> anyhow::Result<ExitCode> {
    match cmd {
        DonationCommand::List { format } => {
            portal.refresh_donations().await;
            print_donations(portal, format)?;
            Ok(ExitCode::SUCCESS)
        }
        DonationCommand::Add(args) => {
            *portal.donation_form_mut() = args.into();
            let result = portal.create_donation().await;
            finish_write(portal, result, |p| print_donations(p, OutputFormat::Table))
        }
    }
}

/// Print the outcome of a write. Missing fields abort; API failures show the
/// portal's fixed message and exit non-zero.
fn finish_write(
    portal: &Portal<HttpApi>,
    result: bloodportal::Result<()>,
    show: impl FnOnce(&Portal<HttpApi>) -> anyhow::Result<()>,
) -> anyhow::Result<ExitCode> {
    match result {
        Ok(()) => {
            if let Some(message) = portal.message() {
                println!("{message}");
                println!();
            }
            show(portal)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_missing_field() => Err(e.into()),
        Err(_) => {
            if let Some(message) = portal.message() {
                eprintln!("{message}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_donors(portal: &Portal<HttpApi>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render::donor_table(portal.donors())),
        OutputFormat::Json => print_json(&portal.donors())?,
    }
    Ok(())
}

fn print_donations(portal: &Portal<HttpApi>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render::donation_table(portal.donations())),
        OutputFormat::Json => print_json(&portal.donations())?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_config(
    path: Option<PathBuf>,
    api_url: Option<String>,
    cmd: ConfigCommand,
) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(path, api_url)?;
            if json {
                print_json(&config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                match config.api.timeout_secs {
                    Some(secs) => println!("  Timeout (secs):     {secs}"),
                    None => println!("  Timeout (secs):     default"),
                }
            }
        }
        ConfigCommand::Path => {
            let path = path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let result = match file {
                Some(file) => {
                    println!("Validating configuration: {}", file.display());
                    Config::load_file(&file)
                }
                None => {
                    let path = path.unwrap_or_else(Config::default_config_path);
                    println!("Validating configuration: {}", path.display());
                    Config::load_from(Some(path))
                }
            };
            match result {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
