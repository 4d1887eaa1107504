use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueHint};

#[derive(Parser, Debug)]
#[command(author, version, about = "Translate grid models into solver input documents", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// TOML file with conversion defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the network and time-series documents for a system descriptor
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// System descriptor (.json, .yaml)
    #[arg(value_hint = ValueHint::FilePath)]
    pub source: PathBuf,

    /// Output path of the network document
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub network: PathBuf,

    /// Output path of the time-series document
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub time_series: PathBuf,

    /// Series resolution in minutes [default: 60, or the config value]
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Number of intervals in the exported horizon [default: 24, or the config value]
    #[arg(long)]
    pub horizon: Option<usize>,

    /// First interval, e.g. 2020-01-01T00:00:00 [default: earliest series]
    #[arg(long, value_parser = parse_start_time)]
    pub start_time: Option<NaiveDateTime>,

    /// Reuse the system cache next to SOURCE unless SOURCE is newer
    #[arg(long)]
    pub reuse: bool,

    /// Exit non-zero when any component could not be encoded
    #[arg(long)]
    pub strict: bool,
}

fn parse_start_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("invalid start time '{value}': {e}"))
}
