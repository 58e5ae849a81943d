//! Core data types for the advisor engine.

mod bar;
mod signal;
mod timeframe;

pub use bar::{Bar, BarSeries};
pub use signal::{Bias, EntryLevel, IndicatorRow, TradeAction, TradeDecision};
pub use timeframe::Timeframe;
