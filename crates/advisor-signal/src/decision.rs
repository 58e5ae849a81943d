//! The live per-cycle decision rule.

use advisor_core::types::{Bias, IndicatorRow, TradeAction, TradeDecision};
use tracing::debug;

/// Evaluates the latest HTF and LTF rows against the current price.
///
/// Returns exactly one verdict per evaluation; the worker makes at most one
/// dispatch call per cycle from it.
#[derive(Debug, Clone, Copy)]
pub struct DecisionRule {
    threshold: f64,
}

impl DecisionRule {
    /// Create a rule with the proximity gate for the symbol being traded.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The proximity gate in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate one cycle.
    ///
    /// The LTF directional label is Buy iff the LTF fast MA is strictly
    /// above the slow MA; it is distinct from the Bullish/Bearish bias even
    /// though the two agree on every non-tied row.
    pub fn evaluate(
        &self,
        symbol: &str,
        htf_latest: &IndicatorRow,
        ltf_latest: &IndicatorRow,
        current_price: f64,
    ) -> TradeDecision {
        let market_bias = htf_latest.bias;
        let ltf_label = if ltf_latest.fast_ma > ltf_latest.slow_ma {
            TradeAction::Buy
        } else {
            TradeAction::Sell
        };

        let distance = (current_price - ltf_latest.fast_ma).abs();
        if distance > self.threshold {
            debug!(
                symbol,
                distance,
                threshold = self.threshold,
                "price outside proximity gate, no entry"
            );
            return TradeDecision::none(symbol, current_price, ltf_latest.timestamp);
        }

        debug!(
            symbol,
            %market_bias,
            %ltf_label,
            current_price,
            "evaluating gated decision"
        );

        let action = if market_bias == Bias::Bullish
            && ltf_label == TradeAction::Buy
            && current_price > ltf_latest.fast_ma
        {
            Some(TradeAction::Buy)
        } else if market_bias == Bias::Bearish
            && ltf_label == TradeAction::Sell
            && current_price < ltf_latest.fast_ma
        {
            Some(TradeAction::Sell)
        } else {
            None
        };

        TradeDecision {
            symbol: symbol.to_string(),
            action,
            reference_price: current_price,
            timestamp: ltf_latest.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(close: f64, fast_ma: f64, slow_ma: f64) -> IndicatorRow {
        IndicatorRow {
            timestamp: 300_000,
            open: close,
            high: close + 0.001,
            low: close - 0.001,
            close,
            fast_ma,
            slow_ma,
            signal: if fast_ma > slow_ma {
                1
            } else if fast_ma < slow_ma {
                -1
            } else {
                0
            },
            crossover: 0,
            bias: Bias::from_mas(fast_ma, slow_ma),
        }
    }

    #[test]
    fn test_confirmed_buy() {
        // HTF Bullish at T0, LTF five minutes later with close above fast
        // MA and range inside the narrow gate
        let htf = row(1.10, 1.12, 1.10);
        let ltf = row(1.1020, 1.1000, 1.0990);
        let rule = DecisionRule::new(0.0050);

        let decision = rule.evaluate("EURUSD", &htf, &ltf, ltf.close);

        assert_eq!(decision.action, Some(TradeAction::Buy));
        assert!((decision.reference_price - 1.1020).abs() < 1e-12);
    }

    #[test]
    fn test_confirmed_sell() {
        let htf = row(1.10, 1.08, 1.10);
        let ltf = row(1.0980, 1.1000, 1.1010);
        let rule = DecisionRule::new(0.0050);

        let decision = rule.evaluate("EURUSD", &htf, &ltf, ltf.close);
        assert_eq!(decision.action, Some(TradeAction::Sell));
    }

    #[test]
    fn test_out_of_range_returns_none_despite_agreement() {
        // Same bias alignment as the buy case but the price sits 0.02 away
        // from the fast MA
        let htf = row(1.10, 1.12, 1.10);
        let ltf = row(1.1200, 1.1000, 1.0990);
        let rule = DecisionRule::new(0.0050);

        let decision = rule.evaluate("EURUSD", &htf, &ltf, ltf.close);
        assert_eq!(decision.action, None);
    }

    #[test]
    fn test_bias_disagreement_returns_none() {
        let htf = row(1.10, 1.08, 1.10); // Bearish macro
        let ltf = row(1.1020, 1.1000, 1.0990); // Bullish trigger
        let rule = DecisionRule::new(0.0050);

        let decision = rule.evaluate("EURUSD", &htf, &ltf, ltf.close);
        assert_eq!(decision.action, None);
    }

    #[test]
    fn test_price_on_wrong_side_of_fast_ma_returns_none() {
        // Bullish everywhere but the current price dipped below the fast MA
        let htf = row(1.10, 1.12, 1.10);
        let ltf = row(1.1020, 1.1000, 1.0990);
        let rule = DecisionRule::new(0.0050);

        let decision = rule.evaluate("EURUSD", &htf, &ltf, 1.0990);
        assert_eq!(decision.action, None);
    }

    #[test]
    fn test_single_verdict_per_evaluation() {
        let rule = DecisionRule::new(0.0050);
        let cases = [
            (row(1.10, 1.12, 1.10), row(1.1020, 1.1000, 1.0990)),
            (row(1.10, 1.08, 1.10), row(1.0980, 1.1000, 1.1010)),
            (row(1.10, 1.10, 1.10), row(1.1000, 1.1000, 1.1000)),
        ];

        for (htf, ltf) in cases {
            let decision = rule.evaluate("EURUSD", &htf, &ltf, ltf.close);
            // Option<TradeAction> makes Buy and Sell mutually exclusive by
            // construction; the verdict is always one of the three.
            assert!(matches!(
                decision.action,
                None | Some(TradeAction::Buy) | Some(TradeAction::Sell)
            ));
        }
    }
}
