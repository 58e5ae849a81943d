//! Entry-level identification across two timeframes.

use advisor_core::types::{Bias, EntryLevel, IndicatorRow, TradeAction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Thresholds;

/// Configuration for the entry-level identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryLevelConfig {
    /// Absolute stop-loss distance from the entry price
    pub stop_loss_distance: f64,
    /// Absolute take-profit distance from the entry price
    pub take_profit_distance: f64,
    /// Proximity gates by quote convention
    pub thresholds: Thresholds,
}

impl Default for EntryLevelConfig {
    fn default() -> Self {
        Self {
            stop_loss_distance: 0.003,
            take_profit_distance: 0.01,
            thresholds: Thresholds::default(),
        }
    }
}

/// Aligns an LTF indicator series against the HTF bias and emits gated
/// entry levels.
#[derive(Debug, Clone)]
pub struct EntryLevelIdentifier {
    config: EntryLevelConfig,
}

impl EntryLevelIdentifier {
    /// Create an identifier with the given configuration.
    pub fn new(config: EntryLevelConfig) -> Self {
        Self { config }
    }

    /// Produce one entry level per LTF row that has a preceding-or-equal
    /// HTF row.
    ///
    /// The join is as-of: each LTF row takes the bias of the latest HTF row
    /// whose timestamp is at or before its own. LTF rows older than the
    /// first HTF row are skipped. Rows that fail the proximity gate or the
    /// directional check stay in the output with no entry.
    pub fn identify(
        &self,
        symbol: &str,
        htf: &[IndicatorRow],
        ltf: &[IndicatorRow],
    ) -> Vec<EntryLevel> {
        let threshold = self.config.thresholds.for_symbol(symbol);
        let mut levels = Vec::with_capacity(ltf.len());

        // Both series are timestamp-ordered, so the HTF cursor only moves
        // forward.
        let mut htf_idx: Option<usize> = None;
        let mut cursor = 0usize;

        for row in ltf {
            while cursor < htf.len() && htf[cursor].timestamp <= row.timestamp {
                htf_idx = Some(cursor);
                cursor += 1;
            }
            let Some(i) = htf_idx else {
                // No HTF context yet for this row
                continue;
            };

            let market_bias = htf[i].bias;
            let range = row.range();
            let mut level = EntryLevel {
                timestamp: row.timestamp,
                market_bias,
                ltf_bias: row.bias,
                range,
                entry: None,
                level: None,
                stop_loss: None,
                take_profit: None,
            };

            if range <= threshold {
                if market_bias == Bias::Bullish
                    && row.bias == Bias::Bullish
                    && row.close > row.fast_ma
                {
                    level.entry = Some(TradeAction::Buy);
                    level.level = Some(row.close);
                    level.stop_loss = Some(row.close - self.config.stop_loss_distance);
                    level.take_profit = Some(row.close + self.config.take_profit_distance);
                } else if market_bias == Bias::Bearish
                    && row.bias == Bias::Bearish
                    && row.close < row.fast_ma
                {
                    level.entry = Some(TradeAction::Sell);
                    level.level = Some(row.close);
                    level.stop_loss = Some(row.close + self.config.stop_loss_distance);
                    level.take_profit = Some(row.close - self.config.take_profit_distance);
                }
            }

            levels.push(level);
        }

        debug!(
            symbol,
            total = levels.len(),
            actionable = levels.iter().filter(|l| l.is_actionable()).count(),
            "identified entry levels"
        );

        levels
    }
}
