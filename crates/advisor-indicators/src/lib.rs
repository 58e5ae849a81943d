//! Indicator calculation for the advisor engine.
//!
//! The single consumer-facing entry point is [`MaCrossover::annotate`], which
//! turns a bar series into indicator rows carrying fast/slow moving
//! averages, signal, crossover, and bias.

mod crossover;
mod sma;

pub use crossover::MaCrossover;
pub use sma::Sma;

/// Trait for batch indicators over a price slice.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// Returns one value per full trailing window; fewer data points than
    /// the period produce an empty vector.
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
