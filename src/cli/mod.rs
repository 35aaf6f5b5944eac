//! Command-line parsing for the loan-offer report tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/statistics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ApiParams, DistributionFilters};

pub mod picker;

pub const DEFAULT_API_URL: &str = "https://kapusta.by/api/internal/v1/public/loans/lend_request/";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lend", version, about = "Loan-offer reports and amount statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load offers from a JSON file or the API and print them as a table.
    Table(TableArgs),
    /// Fetch all offers and print the amount distribution per period bucket.
    Stats(StatsArgs),
    /// Compute income and real annual yield for a single offer.
    Calc(CalcArgs),
    /// Plot a previously exported distribution JSON.
    Plot(PlotArgs),
}

/// Options shared by every command that talks to the API.
#[derive(Debug, Args, Clone)]
pub struct ApiArgs {
    /// Base URL of the loan-offer collection.
    #[arg(long, env = "LEND_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Skip TLS certificate verification.
    #[arg(long, env = "LEND_IGNORE_TLS")]
    pub ignore_tls: bool,

    /// Per-request timeout in seconds.
    #[arg(long, env = "LEND_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    /// Read offers from this JSON file instead of the API.
    #[arg(short = 'f', long, value_name = "JSON", conflicts_with = "pick")]
    pub file: Option<PathBuf>,

    /// Choose a JSON file under the current directory interactively.
    #[arg(long)]
    pub pick: bool,

    /// Column aliases, e.g. "amount=Amount, period_days=Days".
    #[arg(long, env = "LEND_ALIASES", default_value = "")]
    pub aliases: String,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Offer status to request (defaults to `active`).
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long, default_value = "")]
    pub amount_min: String,

    #[arg(long, default_value = "")]
    pub amount_max: String,

    #[arg(long, default_value = "")]
    pub period_days_min: String,

    #[arg(long, default_value = "")]
    pub period_days_max: String,

    #[arg(long, default_value = "")]
    pub rating_min: String,

    /// Export the table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

impl TableArgs {
    pub fn api_params(&self) -> ApiParams {
        ApiParams {
            amount_min: self.amount_min.clone(),
            amount_max: self.amount_max.clone(),
            period_days_min: self.period_days_min.clone(),
            period_days_max: self.period_days_max.clone(),
            rating_min: self.rating_min.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Hide amounts seen fewer times than this (negative means 0).
    #[arg(long, allow_negative_numbers = true)]
    pub min_amount_count: Option<i64>,

    /// Hide amounts seen more times than this (negative means 0).
    #[arg(long, allow_negative_numbers = true)]
    pub max_amount_count: Option<i64>,

    /// Only count offers rated strictly above this.
    #[arg(long, allow_negative_numbers = true)]
    pub min_rating: Option<f64>,

    /// Skip the terminal histogram.
    #[arg(long)]
    pub no_plot: bool,

    /// Histogram bar width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Export the distribution to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl StatsArgs {
    pub fn filters(&self) -> DistributionFilters {
        DistributionFilters {
            min_amount_count: self.min_amount_count.map(clamp_count),
            max_amount_count: self.max_amount_count.map(clamp_count),
            min_rating: self.min_rating,
        }
    }
}

fn clamp_count(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[derive(Debug, Args, Clone)]
pub struct CalcArgs {
    /// Loan amount.
    #[arg(long, default_value = "500")]
    pub amount: String,

    /// Annual rate in percent.
    #[arg(long, default_value = "700")]
    pub rate: String,

    /// Period in days.
    #[arg(long, default_value = "30")]
    pub period: String,
}

/// Options for plotting a saved distribution.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Distribution JSON produced by `lend stats --export`.
    #[arg(long, value_name = "JSON")]
    pub stats: PathBuf,

    /// Histogram bar width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,
}
