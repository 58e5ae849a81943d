//! OHLC bar and bar-series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// A single price bar. Immutable once received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap())
    }
}

/// Ordered sequence of bars for one (symbol, timeframe) pair.
///
/// Timestamps are kept ascending; a push with a timestamp already present
/// replaces the existing bar (last-write-wins) rather than failing.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Create a series from bars in any order; sorts and deduplicates.
    pub fn from_bars(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: impl IntoIterator<Item = Bar>,
    ) -> Self {
        let mut series = Self::new(symbol, timeframe);
        for bar in bars {
            series.push(bar);
        }
        series
    }

    /// Push a bar, keeping timestamps ordered.
    ///
    /// An equal timestamp overwrites the existing bar; an out-of-order
    /// timestamp is inserted at its sorted position.
    pub fn push(&mut self, bar: Bar) {
        match self.bars.last() {
            Some(last) if bar.timestamp > last.timestamp => self.bars.push(bar),
            None => self.bars.push(bar),
            _ => match self.bars.binary_search_by_key(&bar.timestamp, |b| b.timestamp) {
                Ok(i) => self.bars[i] = bar,
                Err(i) => self.bars.insert(i, bar),
            },
        }
    }

    /// Push multiple bars.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.push(bar);
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn test_push_keeps_order() {
        let mut series = BarSeries::new("EURUSD", Timeframe::Hour1);
        series.push(bar(3, 1.3));
        series.push(bar(1, 1.1));
        series.push(bar(2, 1.2));

        let timestamps: Vec<i64> = series.iter().map(|b| b.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_timestamp_last_write_wins() {
        let mut series = BarSeries::new("EURUSD", Timeframe::Hour1);
        series.push(bar(1, 1.10));
        series.push(bar(2, 1.20));
        series.push(bar(2, 1.25));

        assert_eq!(series.len(), 2);
        assert!((series.last().unwrap().close - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_closes_extraction() {
        let series = BarSeries::from_bars(
            "EURUSD",
            Timeframe::Hour1,
            [bar(1, 1.1), bar(2, 1.2), bar(3, 1.3)],
        );
        assert_eq!(series.closes(), vec![1.1, 1.2, 1.3]);
    }

    #[test]
    fn test_bar_direction() {
        let up = Bar::new(1, 1.0, 1.2, 0.9, 1.1);
        assert!(up.is_bullish());
        assert!(!up.is_bearish());
    }
}
