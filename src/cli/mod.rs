//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "advisor")]
#[command(author, version, about = "Multi-timeframe moving-average advisor engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level; defaults to the configuration's [logging] level
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the polling worker pool against the configured symbols
    Run(RunArgs),
    /// Identify entry levels over historical bars and write them to CSV
    Scan(ScanArgs),
    /// Replay identified entry levels as a cumulative-return backtest
    Backtest(BacktestArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbols to poll (comma-separated); overrides the configuration
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Directory holding the bar CSV files; overrides the configuration
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Number of concurrent workers; overrides the configuration
    #[arg(long)]
    pub pool_size: Option<usize>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Symbols to scan (comma-separated); overrides the configuration
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Directory holding the bar CSV files; overrides the configuration
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Directory the entry-level CSVs are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Symbol to backtest
    #[arg(short, long)]
    pub symbol: String,

    /// Directory holding the bar CSV files; overrides the configuration
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the full report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}
