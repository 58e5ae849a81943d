//! Error types for the advisor engine.

use thiserror::Error;

/// Top-level advisor error.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Data feed errors.
///
/// A feed must report failure distinctly from success with zero rows, so
/// "nothing came back" and "a timeframe is missing" are their own variants.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {symbol} on {timeframe}")]
    NoData { symbol: String, timeframe: String },

    #[error("Missing timeframe {timeframe} in multi-timeframe response for {symbol}")]
    MissingTimeframe { symbol: String, timeframe: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Feed error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}

/// Trade dispatch errors.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Dispatch rejected: {0}")]
    Rejected(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Dispatch error: {0}")]
    Internal(String),
}

/// Per-worker cycle errors, handled at the worker boundary.
///
/// `DataUnavailable` and `MissingIndicatorColumns` are retried; a
/// `DispatchFailure` is logged and the next cycle proceeds; `Fatal`
/// terminates only the owning worker.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[source] FeedError),

    #[error("Missing indicator columns: {0}")]
    MissingIndicatorColumns(#[source] IndicatorError),

    #[error("Dispatch failed: {0}")]
    DispatchFailure(#[source] DispatchError),

    #[error("Worker fatal: {0}")]
    Fatal(String),
}

impl WorkerError {
    /// Whether the cycle should be retried after the backoff delay.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::DataUnavailable(_) | WorkerError::MissingIndicatorColumns(_)
        )
    }
}

/// Result type alias for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;
