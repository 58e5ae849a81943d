//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, EngineSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

use advisor_core::types::Timeframe;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("ADVISOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load just the logging section, for bootstrapping the subscriber
/// before the full configuration is validated.
///
/// Falls back to defaults when the file is missing or malformed so the
/// subsequent load error is still visible somewhere.
pub fn load_logging(path: &Path) -> LoggingConfig {
    load_config(path)
        .map(|config| config.logging)
        .unwrap_or_default()
}

/// Reject configurations the engine cannot run with.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if engine.symbols.is_empty() {
        return Err(ConfigError::Message("engine.symbols is empty".into()));
    }
    if engine.pool_size == 0 {
        return Err(ConfigError::Message("engine.pool_size must be > 0".into()));
    }
    if engine.fast_period == 0 || engine.fast_period > engine.slow_period {
        return Err(ConfigError::Message(format!(
            "moving average periods invalid: fast={} slow={}",
            engine.fast_period, engine.slow_period
        )));
    }
    if engine.bar_count < engine.slow_period {
        return Err(ConfigError::Message(format!(
            "engine.bar_count ({}) is below the slow period ({})",
            engine.bar_count, engine.slow_period
        )));
    }
    for (field, value) in [("engine.htf", &engine.htf), ("engine.ltf", &engine.ltf)] {
        value.parse::<Timeframe>().map_err(|e| {
            ConfigError::Message(format!("{field} is not a known timeframe: {e}"))
        })?;
    }
    if engine.poll_interval_secs == 0 || engine.retry_delay_secs == 0 {
        return Err(ConfigError::Message(
            "poll and retry intervals must be > 0".into(),
        ));
    }
    if engine.max_retry_delay_secs < engine.retry_delay_secs {
        return Err(ConfigError::Message(
            "engine.max_retry_delay_secs is below engine.retry_delay_secs".into(),
        ));
    }
    for (field, value) in [
        ("engine.threshold_wide", engine.threshold_wide),
        ("engine.threshold_narrow", engine.threshold_narrow),
        ("engine.stop_loss_distance", engine.stop_loss_distance),
        ("engine.take_profit_distance", engine.take_profit_distance),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Message(format!(
                "{field} must be a positive number, got {value}"
            )));
        }
    }

    Ok(())
}
