//! CLI argument definitions for the weather ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "wx-etl",
    version,
    about = "Weather ETL - Merge ECCC observations with Open-Meteo forecasts",
    long_about = "Merge daily ECCC station observations with the Open-Meteo daily forecast\n\
                  into one flat, date-indexed table.\n\n\
                  Both sources are normalized to a canonical row shape, outer-joined on\n\
                  date, exported as CSV, and handed to the prediction system port."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline: normalize both sources, merge, export.
    Run(RunArgs),

    /// Print the 10-field flat table schema.
    Schema,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the ECCC daily CSV export.
    #[arg(
        long = "eccc-csv",
        value_name = "PATH",
        default_value = "data/eccc_station.csv"
    )]
    pub eccc_csv: PathBuf,

    /// Station latitude for the forecast fetch.
    #[arg(long, default_value_t = 43.79, allow_negative_numbers = true)]
    pub lat: f64,

    /// Station longitude for the forecast fetch.
    #[arg(long, default_value_t = -79.35, allow_negative_numbers = true)]
    pub lon: f64,

    /// Forecast horizon in days (1-16).
    #[arg(long, default_value_t = 16)]
    pub days: u8,

    /// Past days included in the forecast window, for overlap with the
    /// historical source.
    #[arg(long = "past-days", default_value_t = 5)]
    pub past_days: u8,

    /// Output CSV path; overwritten on every run.
    #[arg(long, value_name = "PATH", default_value = "data/flat_weather.csv")]
    pub out: PathBuf,

    /// Prediction system endpoint for the export hook.
    #[arg(
        long = "api-url",
        value_name = "URL",
        default_value = "http://prediction_system/api/v1/data"
    )]
    pub api_url: String,

    /// Compute and report without writing or delivering outputs.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
