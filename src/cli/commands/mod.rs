//! CLI command implementations.

pub mod backtest;
pub mod run;
pub mod scan;
pub mod validate;

use advisor_config::{AppConfig, EngineSettings};
use advisor_core::types::Timeframe;
use advisor_data::{CsvFeed, CsvFeedConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load and validate the configuration file.
pub(crate) fn load(config_path: &Path) -> Result<AppConfig> {
    let config = advisor_config::load_config(config_path)
        .with_context(|| format!("failed to load configuration from {config_path:?}"))?;
    advisor_config::validate(&config).context("configuration is invalid")?;
    Ok(config)
}

/// Build the CSV feed from the engine settings, honoring a directory
/// override from the command line.
pub(crate) fn build_feed(
    engine: &EngineSettings,
    bars_dir: &str,
    data_override: Option<&PathBuf>,
) -> Result<CsvFeed> {
    let dir = data_override
        .cloned()
        .unwrap_or_else(|| PathBuf::from(bars_dir));
    let htf: Timeframe = engine.htf.parse().map_err(anyhow::Error::msg)?;
    let ltf: Timeframe = engine.ltf.parse().map_err(anyhow::Error::msg)?;

    CsvFeed::new(CsvFeedConfig {
        dir,
        htf,
        ltf,
        bar_count: engine.bar_count,
    })
    .context("failed to open the bar data directory")
}
