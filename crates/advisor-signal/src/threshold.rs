//! Proximity thresholds by quote convention.

use serde::{Deserialize, Serialize};

/// Maximum allowed distance between price and the fast MA, per quote
/// convention.
///
/// JPY-quoted USDJPY trades in 2-decimal pips, so its 50-pip gate is two
/// orders of magnitude wider than the 4-decimal-pip gate used for every
/// other pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Gate for 2-decimal-pip pairs (50 pips at 0.01)
    pub wide: f64,
    /// Gate for 4-decimal-pip pairs (50 pips at 0.0001)
    pub narrow: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            wide: 0.50,
            narrow: 0.0050,
        }
    }
}

impl Thresholds {
    /// Select the gate for a symbol.
    pub fn for_symbol(&self, symbol: &str) -> f64 {
        if symbol == "USDJPY" {
            self.wide
        } else {
            self.narrow
        }
    }
}
