//! The moving-average-crossover indicator calculator.

use advisor_core::error::IndicatorError;
use advisor_core::types::{Bar, BarSeries, Bias, IndicatorRow};

use crate::{Indicator, Sma};

/// Annotates a bar series with fast/slow SMAs, signal, crossover, and bias.
///
/// Pure and referentially transparent: identical input always yields
/// identical rows. Rows before the slow window fills are dropped, so a
/// series of length L produces exactly L − slow + 1 rows.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast: Sma,
    slow: Sma,
}

impl MaCrossover {
    /// Create a calculator for the given fast/slow periods.
    ///
    /// The fast period must be positive and no longer than the slow period.
    pub fn new(fast_period: usize, slow_period: usize) -> Result<Self, IndicatorError> {
        if fast_period == 0 {
            return Err(IndicatorError::InvalidPeriod(
                "fast period must be greater than 0".into(),
            ));
        }
        if fast_period > slow_period {
            return Err(IndicatorError::InvalidPeriod(format!(
                "fast period {} exceeds slow period {}",
                fast_period, slow_period
            )));
        }
        Ok(Self {
            fast: Sma::new(fast_period),
            slow: Sma::new(slow_period),
        })
    }

    /// Fast MA window length.
    pub fn fast_period(&self) -> usize {
        self.fast.period()
    }

    /// Slow MA window length.
    pub fn slow_period(&self) -> usize {
        self.slow.period()
    }

    /// Compute indicator rows for the series.
    ///
    /// Fails with `MissingField` when any close is not a finite number and
    /// with `InsufficientData` when the series is shorter than the slow
    /// window.
    pub fn annotate(&self, series: &BarSeries) -> Result<Vec<IndicatorRow>, IndicatorError> {
        let closes = series.closes();

        if closes.iter().any(|c| !c.is_finite()) {
            return Err(IndicatorError::MissingField("close".into()));
        }
        if closes.len() < self.slow.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.slow.period(),
                available: closes.len(),
            });
        }

        let fast_values = self.fast.calculate(&closes);
        let slow_values = self.slow.calculate(&closes);

        // Both MA sequences end at the last bar; align them on the slow
        // window, which fills later.
        let fast_offset = fast_values.len() - slow_values.len();

        let mut rows = Vec::with_capacity(slow_values.len());
        let mut prev_signal: Option<i32> = None;

        for (i, &slow_ma) in slow_values.iter().enumerate() {
            let fast_ma = fast_values[fast_offset + i];
            let bar: &Bar = series
                .get(self.slow.period() - 1 + i)
                .ok_or_else(|| IndicatorError::MissingField("close".into()))?;

            let signal = match fast_ma.partial_cmp(&slow_ma) {
                Some(std::cmp::Ordering::Greater) => 1,
                Some(std::cmp::Ordering::Less) => -1,
                _ => 0,
            };
            let crossover = prev_signal.map_or(0, |prev| signal - prev);
            prev_signal = Some(signal);

            rows.push(IndicatorRow {
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                fast_ma,
                slow_ma,
                signal,
                crossover,
                bias: Bias::from_mas(fast_ma, slow_ma),
            });
        }

        Ok(rows)
    }
}
