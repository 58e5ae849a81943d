//! Simplified cumulative-return backtest over identified entry levels.
//!
//! Positions take effect one bar after their entry row to avoid lookahead.
//! This is a sanity check on the signal stream, not a performance-reporting
//! suite.

use advisor_core::types::{EntryLevel, IndicatorRow, TradeAction};
use serde::{Deserialize, Serialize};

/// One bar of backtest output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestRow {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Close-to-close market return for this bar
    pub market_return: f64,
    /// Market return scaled by the lagged position sign
    pub strategy_return: f64,
    /// Running product of (1 + market_return)
    pub cumulative_market: f64,
    /// Running product of (1 + strategy_return)
    pub cumulative_strategy: f64,
}

/// Summary of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Per-bar rows, oldest first
    pub rows: Vec<BacktestRow>,
    /// Number of actionable entries encountered
    pub entries: usize,
    /// Final cumulative market return factor
    pub final_market: f64,
    /// Final cumulative strategy return factor
    pub final_strategy: f64,
}

fn position_sign(action: Option<TradeAction>) -> f64 {
    match action {
        Some(TradeAction::Buy) => 1.0,
        Some(TradeAction::Sell) => -1.0,
        None => 0.0,
    }
}

/// Run the cumulative-return calculation.
///
/// `ltf` supplies the close prices; `levels` supplies the entry stream and
/// is joined back onto the rows by timestamp (levels are a subset of the
/// LTF rows by construction).
pub fn run_backtest(ltf: &[IndicatorRow], levels: &[EntryLevel]) -> BacktestReport {
    let mut rows = Vec::new();
    let mut cumulative_market = 1.0;
    let mut cumulative_strategy = 1.0;

    let mut level_cursor = 0usize;
    let mut prev_action: Option<TradeAction> = None;
    let mut prev_close: Option<f64> = None;

    for row in ltf {
        // Position for this bar comes from the previous row's entry
        let lagged = position_sign(prev_action);

        // Advance to this row's entry level, if one was emitted for it
        let mut action = None;
        while level_cursor < levels.len() && levels[level_cursor].timestamp <= row.timestamp {
            if levels[level_cursor].timestamp == row.timestamp {
                action = levels[level_cursor].entry;
            }
            level_cursor += 1;
        }

        if let Some(prev) = prev_close {
            let market_return = row.close / prev - 1.0;
            let strategy_return = market_return * lagged;
            cumulative_market *= 1.0 + market_return;
            cumulative_strategy *= 1.0 + strategy_return;

            rows.push(BacktestRow {
                timestamp: row.timestamp,
                market_return,
                strategy_return,
                cumulative_market,
                cumulative_strategy,
            });
        }

        prev_action = action;
        prev_close = Some(row.close);
    }

    BacktestReport {
        entries: levels.iter().filter(|l| l.is_actionable()).count(),
        final_market: cumulative_market,
        final_strategy: cumulative_strategy,
        rows,
    }
}
