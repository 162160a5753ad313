//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::{config::HolidayProvider, ledger::bill::parse_bill_date};

/// Cash-flow projection over recurring bills.
#[derive(Debug, Parser)]
#[command(name = "forecast_core_cli")]
#[command(about = "Project a bank balance forward over recurring bills", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a projection and write calendars, the upcoming table and the summary
    Project(ProjectArgs),

    /// List the holidays a provider reports for one year
    Holidays {
        #[arg(long)]
        year: i32,

        /// ISO country code (defaults to the configured one)
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        provider: Option<HolidayProvider>,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// CSV export of the bills sheet (header row first)
    #[arg(long)]
    pub bills: PathBuf,

    /// Number of days to project
    #[arg(long)]
    pub days: Option<u32>,

    /// Opening balance override, e.g. 2500 or "$2,500.00"
    #[arg(long, allow_hyphen_values = true)]
    pub balance: Option<String>,

    /// JSON endpoint to read the opening balance from
    #[arg(long)]
    pub balance_url: Option<String>,

    /// First projected day (defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,

    /// Directory for bills.ics, balance.ics, upcoming.csv and summary.json
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub holidays: Option<HolidayProvider>,

    /// Alert when the lowest balance drops below this amount
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Append low balance alerts to alerts.txt in the output directory
    #[arg(long)]
    pub outbox: bool,

    /// Upcoming rows to print
    #[arg(long, default_value_t = 15)]
    pub show: usize,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    parse_bill_date(raw).ok_or_else(|| format!("`{raw}` is not a date (use YYYY-MM-DD)"))
}
