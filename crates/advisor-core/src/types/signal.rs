//! Indicator rows, entry levels, and trade decisions.
//!
//! These are the explicit record types flowing between the indicator
//! calculator, the entry-level identifier, the decision rule, and the
//! dispatch collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional lean derived from moving-average ordering.
///
/// Bullish iff the fast MA is strictly above the slow MA; a tie resolves
/// to Bearish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    /// Derive the bias from a fast/slow MA pair.
    pub fn from_mas(fast_ma: f64, slow_ma: f64) -> Self {
        if fast_ma > slow_ma {
            Bias::Bullish
        } else {
            Bias::Bearish
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Bullish => write!(f, "Bullish"),
            Bias::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Trade direction for an entry or dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// A bar annotated with moving averages, signal, crossover, and bias.
///
/// Rows before the slow window fills are never materialized; every row
/// carries defined fast/slow MAs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
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
    /// Fast simple moving average
    pub fast_ma: f64,
    /// Slow simple moving average
    pub slow_ma: f64,
    /// +1 if fast > slow, -1 if fast < slow, 0 if equal
    pub signal: i32,
    /// Difference of consecutive signals; 2 = bullish cross, -2 = bearish cross
    pub crossover: i32,
    /// Directional lean of this row
    pub bias: Bias,
}

impl IndicatorRow {
    /// Distance between the close and the fast MA.
    #[inline]
    pub fn range(&self) -> f64 {
        (self.close - self.fast_ma).abs()
    }
}

/// An LTF row joined to its prevailing HTF bias, with gated entry levels.
///
/// Rows that fail the proximity gate or the directional check keep their
/// bias/range context but carry no entry, preserving audit continuity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryLevel {
    /// Unix timestamp of the LTF row in milliseconds
    pub timestamp: i64,
    /// Bias of the latest HTF row at or before this timestamp
    pub market_bias: Bias,
    /// Bias of the LTF row itself
    pub ltf_bias: Bias,
    /// |close - fastMA| on the LTF row
    pub range: f64,
    /// Trade direction, when the row qualifies
    pub entry: Option<TradeAction>,
    /// Entry price (the LTF close), when the row qualifies
    pub level: Option<f64>,
    /// Stop-loss price, when the row qualifies
    pub stop_loss: Option<f64>,
    /// Take-profit price, when the row qualifies
    pub take_profit: Option<f64>,
}

impl EntryLevel {
    /// Whether this row produced an actionable entry.
    #[inline]
    pub fn is_actionable(&self) -> bool {
        self.entry.is_some()
    }
}

/// The verdict of one live evaluation cycle for one symbol.
///
/// Ephemeral: handed to the dispatch collaborator and discarded. An action
/// of `None` means no dispatch call is made this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    /// Symbol the decision applies to
    pub symbol: String,
    /// Buy, Sell, or no action
    pub action: Option<TradeAction>,
    /// Price the decision was evaluated against
    pub reference_price: f64,
    /// Unix timestamp of the evaluated LTF row in milliseconds
    pub timestamp: i64,
}

impl TradeDecision {
    /// A no-action decision for the given symbol.
    pub fn none(symbol: impl Into<String>, reference_price: f64, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            action: None,
            reference_price,
            timestamp,
        }
    }
}
