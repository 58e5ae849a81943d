//! Signal evaluation for the advisor engine.
//!
//! Combines a higher-timeframe bias with lower-timeframe triggers, both for
//! historical entry-level identification and for the live per-cycle
//! decision rule. All evaluation here is pure; dispatch and persistence
//! live behind the collaborator traits.

mod backtest;
mod decision;
mod entry_levels;
mod threshold;

pub use backtest::{BacktestReport, BacktestRow, run_backtest};
pub use decision::DecisionRule;
pub use entry_levels::{EntryLevelConfig, EntryLevelIdentifier};
pub use threshold::Thresholds;
