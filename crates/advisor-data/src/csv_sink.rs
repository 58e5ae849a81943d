//! CSV persistence for identified entry levels.

use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::info;

use advisor_core::error::AdvisorError;
use advisor_core::types::EntryLevel;

/// Appends entry levels to one CSV file per symbol.
///
/// Creates `<symbol>_entry_levels.csv` with a header on first write and
/// appends header-less rows afterwards.
pub struct CsvSignalLog {
    dir: PathBuf,
}

impl CsvSignalLog {
    /// Create a log rooted at the given directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AdvisorError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file a symbol's levels land in.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}_entry_levels.csv"))
    }

    /// Append the levels for one symbol; returns the file written.
    pub fn append(&self, symbol: &str, levels: &[EntryLevel]) -> Result<PathBuf, AdvisorError> {
        let path = self.path_for(symbol);
        let new_file = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if new_file {
            writer
                .write_record([
                    "timestamp",
                    "market_bias",
                    "ltf_bias",
                    "range",
                    "entry",
                    "level",
                    "stop_loss",
                    "take_profit",
                ])
                .map_err(|e| AdvisorError::Internal(e.to_string()))?;
        }

        for level in levels {
            writer
                .write_record([
                    level.timestamp.to_string(),
                    level.market_bias.to_string(),
                    level.ltf_bias.to_string(),
                    format!("{:.6}", level.range),
                    level.entry.map(|e| e.to_string()).unwrap_or_default(),
                    format_price(level.level),
                    format_price(level.stop_loss),
                    format_price(level.take_profit),
                ])
                .map_err(|e| AdvisorError::Internal(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| AdvisorError::Internal(e.to_string()))?;

        info!(symbol, rows = levels.len(), path = %path.display(), "entry levels written");
        Ok(path)
    }
}

fn format_price(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}
