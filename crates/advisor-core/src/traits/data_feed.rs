//! Data feed trait definition.

use crate::error::FeedError;
use crate::types::{BarSeries, Timeframe};
use async_trait::async_trait;

/// The two bar series one evaluation cycle consumes.
#[derive(Debug, Clone)]
pub struct MultiTimeframeBars {
    /// Higher-timeframe series (macro trend filter)
    pub htf: BarSeries,
    /// Lower-timeframe series (tactical entry trigger)
    pub ltf: BarSeries,
}

/// Trait for the market data feed collaborator.
///
/// Failure is reported distinctly from success with zero rows; an empty
/// response for a known symbol is a `FeedError::NoData`.
#[async_trait]
pub trait DataFeed: Send + Sync {
    /// Fetch the most recent bars for one symbol and timeframe.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `bar_count` - Maximum number of trailing bars to return
    ///
    /// # Returns
    /// A non-empty bar series ordered from oldest to newest
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<BarSeries, FeedError>;

    /// Fetch the HTF and LTF series for one symbol in a single call.
    ///
    /// A missing timeframe in the response is a failure, not a partial
    /// success.
    async fn fetch_multi_timeframe(&self, symbol: &str) -> Result<MultiTimeframeBars, FeedError>;

    /// Close the underlying session.
    ///
    /// The scheduler guarantees this is invoked at most once per process
    /// run, after all workers have finished.
    async fn close(&self) -> Result<(), FeedError>;

    /// Get the feed name.
    fn name(&self) -> &str;
}
