//! Configuration structures.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "advisor".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level, overridable with `--log-level`
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Locations of market data inputs and signal outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding `<symbol>_<timeframe>.csv` bar files
    pub bars_dir: String,
    /// Directory entry-level CSVs are written to
    pub signals_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            bars_dir: "data".to_string(),
            signals_dir: "signals".to_string(),
        }
    }
}

/// Signal engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Symbols the worker pool polls
    pub symbols: Vec<String>,
    /// Number of concurrent workers
    pub pool_size: usize,
    pub fast_period: usize,
    pub slow_period: usize,
    /// Higher timeframe, e.g. "4h"
    pub htf: String,
    /// Lower timeframe, e.g. "1h"
    pub ltf: String,
    /// Bars requested per fetch
    pub bar_count: usize,
    pub poll_interval_secs: u64,
    /// Initial delay before retrying a failed fetch
    pub retry_delay_secs: u64,
    /// Ceiling for the retry backoff
    pub max_retry_delay_secs: u64,
    /// Proximity gate for JPY-quoted symbols
    pub threshold_wide: f64,
    /// Proximity gate for everything else
    pub threshold_narrow: f64,
    pub stop_loss_distance: f64,
    pub take_profit_distance: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            symbols: vec!["EURUSD".to_string(), "USDJPY".to_string()],
            pool_size: 4,
            fast_period: 50,
            slow_period: 150,
            htf: "4h".to_string(),
            ltf: "1h".to_string(),
            bar_count: 1000,
            poll_interval_secs: 60,
            retry_delay_secs: 10,
            max_retry_delay_secs: 300,
            threshold_wide: 0.50,
            threshold_narrow: 0.0050,
            stop_loss_distance: 0.003,
            take_profit_distance: 0.01,
        }
    }
}
