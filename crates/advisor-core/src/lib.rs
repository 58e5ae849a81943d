//! Core types and traits for the advisor engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Indicator rows, entry levels, and trade decisions
//! - Collaborator traits for the data feed, trade dispatch, and notifications

pub mod types;
pub mod traits;
pub mod error;

pub use error::{AdvisorError, AdvisorResult};
pub use types::*;
pub use traits::*;
