//! Advisor engine CLI application.

mod cli;

use advisor_monitor::setup_logging;
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; the CLI flags override the configuration's
    // [logging] section
    let logging = advisor_config::load_logging(&cli.config);
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => logging.level.as_str(),
    };
    setup_logging(log_level, cli.json_logs || logging.format == "json");

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &cli.config).await,
        Commands::Scan(args) => cli::commands::scan::run(args, &cli.config).await,
        Commands::Backtest(args) => cli::commands::backtest::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
