//! Data adapters: a CSV-backed feed for offline runs and a CSV sink for
//! identified entry levels. The live vendor terminal stays behind the
//! `DataFeed` trait and is not part of this crate.

mod csv_feed;
mod csv_sink;

pub use csv_feed::{CsvFeed, CsvFeedConfig};
pub use csv_sink::CsvSignalLog;
