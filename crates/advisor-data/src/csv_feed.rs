//! CSV-backed data feed.
//!
//! Serves bars from one file per (symbol, timeframe) pair, named
//! `<symbol>_<timeframe>.csv` under the configured directory.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use advisor_core::error::FeedError;
use advisor_core::traits::{DataFeed, MultiTimeframeBars};
use advisor_core::types::{Bar, BarSeries, Timeframe};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "time", alias = "timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
}

/// Configuration for the CSV feed.
#[derive(Debug, Clone)]
pub struct CsvFeedConfig {
    /// Directory holding the per-symbol files
    pub dir: PathBuf,
    /// Higher timeframe served by `fetch_multi_timeframe`
    pub htf: Timeframe,
    /// Lower timeframe served by `fetch_multi_timeframe`
    pub ltf: Timeframe,
    /// Trailing window size per fetch
    pub bar_count: usize,
}

/// A `DataFeed` over local CSV files.
pub struct CsvFeed {
    config: CsvFeedConfig,
}

impl CsvFeed {
    /// Create a feed rooted at the configured directory.
    pub fn new(config: CsvFeedConfig) -> Result<Self, FeedError> {
        if !config.dir.is_dir() {
            return Err(FeedError::Connection(format!(
                "data directory not found: {}",
                config.dir.display()
            )));
        }
        Ok(Self { config })
    }

    fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.config.dir.join(format!("{symbol}_{timeframe}.csv"))
    }

    fn load(
        &self,
        path: &Path,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<BarSeries, FeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        let mut series = BarSeries::new(symbol, timeframe);
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| FeedError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;
            series.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
            ));
        }

        if series.is_empty() {
            return Err(FeedError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }

        // Trailing window only; the calculator recomputes from scratch
        // each cycle.
        if series.len() > bar_count {
            let bars: Vec<Bar> = series
                .bars()
                .iter()
                .skip(series.len() - bar_count)
                .copied()
                .collect();
            series = BarSeries::from_bars(symbol, timeframe, bars);
        }

        debug!(symbol, %timeframe, bars = series.len(), "loaded bars from csv");
        Ok(series)
    }
}

#[async_trait]
impl DataFeed for CsvFeed {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<BarSeries, FeedError> {
        let path = self.path_for(symbol, timeframe);
        if !path.is_file() {
            return Err(FeedError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
        self.load(&path, symbol, timeframe, bar_count)
    }

    async fn fetch_multi_timeframe(&self, symbol: &str) -> Result<MultiTimeframeBars, FeedError> {
        // An absent file is a missing timeframe key, not an empty result
        for timeframe in [self.config.htf, self.config.ltf] {
            if !self.path_for(symbol, timeframe).is_file() {
                return Err(FeedError::MissingTimeframe {
                    symbol: symbol.to_string(),
                    timeframe: timeframe.to_string(),
                });
            }
        }

        let htf = self
            .fetch_bars(symbol, self.config.htf, self.config.bar_count)
            .await?;
        let ltf = self
            .fetch_bars(symbol, self.config.ltf, self.config.bar_count)
            .await?;
        Ok(MultiTimeframeBars { htf, ltf })
    }

    async fn close(&self) -> Result<(), FeedError> {
        debug!("csv feed closed");
        Ok(())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, FeedError> {
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d",
        "%Y/%m/%d",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            let dt = d.and_hms_opt(0, 0, 0).unwrap();
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(FeedError::Parse(format!("could not parse date: {date_str}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn feed(dir: &Path) -> CsvFeed {
        CsvFeed::new(CsvFeedConfig {
            dir: dir.to_path_buf(),
            htf: Timeframe::Hour4,
            ltf: Timeframe::Hour1,
            bar_count: 1000,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("1705312800000").is_ok()); // Unix ms
        assert!(parse_timestamp("1705312800").is_ok()); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_bars_sorted_and_windowed() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "EURUSD_1h.csv",
            "time,open,high,low,close\n\
             2024-01-15 11:00:00,1.2,1.3,1.1,1.21\n\
             2024-01-15 10:00:00,1.1,1.2,1.0,1.20\n\
             2024-01-15 12:00:00,1.3,1.4,1.2,1.22\n",
        );

        let feed = feed(dir.path());
        let series = feed.fetch_bars("EURUSD", Timeframe::Hour1, 2).await.unwrap();

        // Sorted ascending, trailing window of 2
        assert_eq!(series.len(), 2);
        assert!((series.get(0).unwrap().close - 1.21).abs() < 1e-12);
        assert!((series.last().unwrap().close - 1.22).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_empty_file_is_no_data_not_empty_success() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "EURUSD_1h.csv", "time,open,high,low,close\n");

        let feed = feed(dir.path());
        assert!(matches!(
            feed.fetch_bars("EURUSD", Timeframe::Hour1, 10).await,
            Err(FeedError::NoData { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_timeframe_file_is_reported_distinctly() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "EURUSD_1h.csv",
            "time,open,high,low,close\n2024-01-15,1.1,1.2,1.0,1.15\n",
        );

        // No 4h file for the symbol
        let feed = feed(dir.path());
        assert!(matches!(
            feed.fetch_multi_timeframe("EURUSD").await,
            Err(FeedError::MissingTimeframe { timeframe, .. }) if timeframe == "4h"
        ));
    }

    #[tokio::test]
    async fn test_multi_timeframe_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let rows = "time,open,high,low,close\n\
                    2024-01-15 08:00:00,1.1,1.2,1.0,1.15\n\
                    2024-01-15 12:00:00,1.15,1.25,1.05,1.18\n";
        write_file(dir.path(), "EURUSD_4h.csv", rows);
        write_file(dir.path(), "EURUSD_1h.csv", rows);

        let feed = feed(dir.path());
        let bars = feed.fetch_multi_timeframe("EURUSD").await.unwrap();
        assert_eq!(bars.htf.timeframe, Timeframe::Hour4);
        assert_eq!(bars.ltf.timeframe, Timeframe::Hour1);
        assert_eq!(bars.htf.len(), 2);
    }
}
