//! The per-symbol polling worker.

use std::sync::Arc;
use std::time::Duration;

use advisor_core::error::{IndicatorError, WorkerError};
use advisor_core::traits::{DataFeed, Notifier, TradeDispatch};
use advisor_indicators::MaCrossover;
use advisor_monitor::{HealthRegistry, WorkerPhase};
use advisor_signal::{DecisionRule, Thresholds};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::SymbolQueue;

/// One worker of the pool.
///
/// Dequeues a symbol at startup and keeps it for the life of the loop:
/// fetch → compute → decide → dispatch → sleep. All errors are handled
/// here; nothing escalates past the worker boundary.
pub(crate) struct Worker {
    pub queue: Arc<SymbolQueue>,
    pub feed: Arc<dyn DataFeed>,
    pub dispatch: Arc<dyn TradeDispatch>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub health: Arc<HealthRegistry>,
    pub shutdown: watch::Receiver<bool>,
    pub calculator: MaCrossover,
    pub thresholds: Thresholds,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Worker {
    pub async fn run(mut self) {
        let Some(symbol) = self.queue.dequeue() else {
            debug!("symbol queue drained, worker exiting");
            return;
        };

        let rule = DecisionRule::new(self.thresholds.for_symbol(&symbol));
        info!(symbol, threshold = rule.threshold(), "worker started");

        let mut backoff = self.retry_delay;
        loop {
            // Cooperative shutdown, checked between cycles only
            if *self.shutdown.borrow() {
                info!(symbol, "shutdown requested, worker exiting");
                break;
            }

            match self.cycle(&symbol, &rule).await {
                Ok(()) => {
                    backoff = self.retry_delay;
                    self.health.record_cycle(&symbol);
                    self.health.set_phase(&symbol, WorkerPhase::Sleeping);
                    if sleep_or_shutdown(&mut self.shutdown, self.poll_interval).await {
                        info!(symbol, "shutdown requested, worker exiting");
                        break;
                    }
                }
                Err(err) if err.is_retryable() => {
                    let streak = self.health.record_fetch_failure(&symbol);
                    warn!(
                        symbol,
                        error = %err,
                        streak,
                        delay_ms = backoff.as_millis() as u64,
                        "cycle failed, backing off before retry"
                    );
                    if sleep_or_shutdown(&mut self.shutdown, backoff).await {
                        info!(symbol, "shutdown requested, worker exiting");
                        break;
                    }
                    backoff = (backoff * 2).min(self.max_retry_delay);
                }
                Err(err) => {
                    error!(symbol, error = %err, "fatal worker error, stopping this worker");
                    break;
                }
            }
        }

        self.health.set_phase(&symbol, WorkerPhase::Stopped);
    }

    async fn cycle(&self, symbol: &str, rule: &DecisionRule) -> Result<(), WorkerError> {
        self.health.set_phase(symbol, WorkerPhase::Fetching);
        let bars = self
            .feed
            .fetch_multi_timeframe(symbol)
            .await
            .map_err(WorkerError::DataUnavailable)?;
        self.health.clear_fetch_failures(symbol);

        self.health.set_phase(symbol, WorkerPhase::Computing);
        let htf_rows = self
            .calculator
            .annotate(&bars.htf)
            .map_err(WorkerError::MissingIndicatorColumns)?;
        let ltf_rows = self
            .calculator
            .annotate(&bars.ltf)
            .map_err(WorkerError::MissingIndicatorColumns)?;

        let (Some(htf_latest), Some(ltf_latest)) = (htf_rows.last(), ltf_rows.last()) else {
            return Err(WorkerError::MissingIndicatorColumns(
                IndicatorError::InsufficientData {
                    required: self.calculator.slow_period(),
                    available: 0,
                },
            ));
        };

        self.health.set_phase(symbol, WorkerPhase::Deciding);
        let current_price = ltf_latest.close;
        let decision = rule.evaluate(symbol, htf_latest, ltf_latest, current_price);

        self.health.set_phase(symbol, WorkerPhase::Dispatching);
        match decision.action {
            Some(action) => {
                info!(
                    symbol,
                    %action,
                    price = decision.reference_price,
                    "confirmed signal, dispatching"
                );
                if let Some(notifier) = &self.notifier {
                    notifier
                        .notify(&format!(
                            "{symbol}: {action} signal at {:.5}",
                            decision.reference_price
                        ))
                        .await;
                }
                if let Err(err) = self.dispatch.dispatch(&decision).await {
                    // Not retried within the cycle; the next cycle
                    // re-evaluates from fresh data.
                    warn!(symbol, error = %WorkerError::DispatchFailure(err), "dispatch failed");
                }
            }
            None => debug!(symbol, price = current_price, "no action this cycle"),
        }

        Ok(())
    }
}

/// Sleep for `duration`, waking early on shutdown. Returns true when the
/// worker should exit.
async fn sleep_or_shutdown(shutdown: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}
