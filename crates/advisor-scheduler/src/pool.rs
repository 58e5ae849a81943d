//! The fixed-size worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use advisor_core::error::AdvisorError;
use advisor_core::traits::{DataFeed, Notifier, TradeDispatch};
use advisor_core::AdvisorResult;
use advisor_indicators::MaCrossover;
use advisor_monitor::HealthRegistry;
use advisor_signal::Thresholds;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::queue::SymbolQueue;
use crate::worker::Worker;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Symbols to queue at startup
    pub symbols: Vec<String>,
    /// Number of concurrent workers
    pub pool_size: usize,
    /// Fast MA window length
    pub fast_period: usize,
    /// Slow MA window length
    pub slow_period: usize,
    /// Inter-cycle sleep
    pub poll_interval: Duration,
    /// Initial fetch-failure backoff
    pub retry_delay: Duration,
    /// Backoff ceiling
    pub max_retry_delay: Duration,
    /// Proximity gates by quote convention
    pub thresholds: Thresholds,
}

/// Runs one worker per queued symbol, up to the configured pool size.
///
/// Workers are independent: a panic or fatal error in one never stops its
/// siblings. After the last worker finishes, the shared feed session is
/// closed exactly once.
pub struct WorkerPool {
    config: SchedulerConfig,
    feed: Arc<dyn DataFeed>,
    dispatch: Arc<dyn TradeDispatch>,
    notifier: Option<Arc<dyn Notifier>>,
    health: Arc<HealthRegistry>,
    calculator: MaCrossover,
    feed_closed: AtomicBool,
}

impl WorkerPool {
    /// Create a pool. Fails when the MA periods are invalid or the pool
    /// size is zero.
    pub fn new(
        config: SchedulerConfig,
        feed: Arc<dyn DataFeed>,
        dispatch: Arc<dyn TradeDispatch>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> AdvisorResult<Self> {
        if config.pool_size == 0 {
            return Err(AdvisorError::Config(
                "pool size must be greater than 0".into(),
            ));
        }
        let calculator = MaCrossover::new(config.fast_period, config.slow_period)?;

        Ok(Self {
            config,
            feed,
            dispatch,
            notifier,
            health: Arc::new(HealthRegistry::new()),
            calculator,
            feed_closed: AtomicBool::new(false),
        })
    }

    /// The shared health registry workers publish into.
    pub fn health(&self) -> Arc<HealthRegistry> {
        Arc::clone(&self.health)
    }

    /// Run the pool until every worker has finished.
    ///
    /// Workers finish on fatal error or when `shutdown` flips to true;
    /// otherwise their loops are unbounded.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> AdvisorResult<()> {
        let queue = Arc::new(SymbolQueue::new(self.config.symbols.iter().cloned()));
        let worker_count = self.config.pool_size.min(queue.len());
        info!(
            symbols = queue.len(),
            workers = worker_count,
            "starting worker pool"
        );

        // Workers take one symbol each and never re-dequeue, so a pool
        // smaller than the symbol list leaves the tail unpolled.
        if queue.len() > worker_count {
            let unserved = self.config.symbols[worker_count..].join(", ");
            warn!(
                pool_size = worker_count,
                symbols = queue.len(),
                %unserved,
                "pool smaller than symbol list; unserved symbols will not be polled"
            );
        }

        let mut tasks = JoinSet::new();
        for _ in 0..worker_count {
            let worker = Worker {
                queue: Arc::clone(&queue),
                feed: Arc::clone(&self.feed),
                dispatch: Arc::clone(&self.dispatch),
                notifier: self.notifier.clone(),
                health: Arc::clone(&self.health),
                shutdown: shutdown.clone(),
                calculator: self.calculator.clone(),
                thresholds: self.config.thresholds,
                poll_interval: self.config.poll_interval,
                retry_delay: self.config.retry_delay,
                max_retry_delay: self.config.max_retry_delay,
            };
            tasks.spawn(worker.run());
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                if err.is_panic() {
                    // The panic ended only this worker's loop
                    error!(error = %err, "worker panicked; sibling workers continue");
                } else {
                    debug!(error = %err, "worker task cancelled");
                }
            }
        }

        self.close_feed().await;
        info!("worker pool stopped");
        Ok(())
    }

    /// Close the shared feed session. Safe to call more than once; only
    /// the first call reaches the feed.
    pub async fn close_feed(&self) {
        if self.feed_closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(err) = self.feed.close().await {
            warn!(error = %err, "failed to close data feed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::error::{DispatchError, FeedError};
    use advisor_core::traits::{DispatchAck, MultiTimeframeBars};
    use advisor_core::types::{Bar, BarSeries, Timeframe, TradeDecision};
    use advisor_monitor::WorkerPhase;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Rising closes whose latest bar sits just above the fast MA and
    /// inside the narrow gate: a confirmed Buy on every cycle.
    fn bullish_series(symbol: &str, timeframe: Timeframe) -> BarSeries {
        let closes = [1.0, 1.0, 1.0, 1.0, 1.001, 1.002, 1.003, 1.004];
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 60_000, c, c + 0.0005, c - 0.0005, c));
        BarSeries::from_bars(symbol, timeframe, bars)
    }

    struct ScriptedFeed {
        /// Feed failures to serve before data becomes available
        failures_remaining: AtomicU32,
        /// Symbol whose fetch panics, for fault injection
        panic_symbol: Option<String>,
        close_calls: AtomicU32,
    }

    impl ScriptedFeed {
        fn new() -> Self {
            Self {
                failures_remaining: AtomicU32::new(0),
                panic_symbol: None,
                close_calls: AtomicU32::new(0),
            }
        }

        fn failing_first(count: u32) -> Self {
            Self {
                failures_remaining: AtomicU32::new(count),
                ..Self::new()
            }
        }

        fn panicking_on(symbol: &str) -> Self {
            Self {
                panic_symbol: Some(symbol.to_string()),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl DataFeed for ScriptedFeed {
        async fn fetch_bars(
            &self,
            symbol: &str,
            timeframe: Timeframe,
            _bar_count: usize,
        ) -> Result<BarSeries, FeedError> {
            Ok(bullish_series(symbol, timeframe))
        }

        async fn fetch_multi_timeframe(
            &self,
            symbol: &str,
        ) -> Result<MultiTimeframeBars, FeedError> {
            if self.panic_symbol.as_deref() == Some(symbol) {
                panic!("injected fault for {symbol}");
            }
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                return Err(FeedError::NoData {
                    symbol: symbol.to_string(),
                    timeframe: "4h".into(),
                });
            }
            Ok(MultiTimeframeBars {
                htf: bullish_series(symbol, Timeframe::Hour4),
                ltf: bullish_series(symbol, Timeframe::Hour1),
            })
        }

        async fn close(&self) -> Result<(), FeedError> {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct RecordingDispatch {
        decisions: Mutex<Vec<TradeDecision>>,
    }

    #[async_trait]
    impl TradeDispatch for RecordingDispatch {
        async fn dispatch(&self, decision: &TradeDecision) -> Result<DispatchAck, DispatchError> {
            self.decisions.lock().unwrap().push(decision.clone());
            Ok(DispatchAck { id: Uuid::new_v4() })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn config(symbols: &[&str]) -> SchedulerConfig {
        SchedulerConfig {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            pool_size: 4,
            fast_period: 2,
            slow_period: 4,
            poll_interval: Duration::from_millis(10),
            retry_delay: Duration::from_millis(5),
            max_retry_delay: Duration::from_millis(40),
            thresholds: Thresholds::default(),
        }
    }

    async fn run_pool_for(
        pool: Arc<WorkerPool>,
        duration: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn({
            let pool = Arc::clone(&pool);
            async move {
                pool.run(rx).await.unwrap();
            }
        });
        tokio::time::sleep(duration).await;
        tx.send(true).unwrap();
        handle
    }

    #[tokio::test]
    async fn test_empty_symbol_list_stops_and_closes_feed() {
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool = WorkerPool::new(config(&[]), feed.clone(), dispatch, None).unwrap();

        let (_tx, rx) = watch::channel(false);
        pool.run(rx).await.unwrap();

        assert_eq!(feed.close_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_feed_closed_exactly_once() {
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool =
            Arc::new(WorkerPool::new(config(&["EURUSD"]), feed.clone(), dispatch, None).unwrap());

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(50)).await;
        handle.await.unwrap();

        // A second explicit close must not reach the feed again
        pool.close_feed().await;
        assert_eq!(feed.close_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_confirmed_signal_dispatches_once_per_cycle() {
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool = Arc::new(
            WorkerPool::new(config(&["EURUSD"]), feed, dispatch.clone(), None).unwrap(),
        );
        let health = pool.health();

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(80)).await;
        handle.await.unwrap();

        let decisions = dispatch.decisions.lock().unwrap();
        let cycles = health.get("EURUSD").unwrap().cycles_completed;

        assert!(!decisions.is_empty());
        // At most one dispatch per completed cycle
        assert!(decisions.len() as u64 <= cycles);
        assert!(decisions.iter().all(|d| d.symbol == "EURUSD"));
        assert!(decisions
            .iter()
            .all(|d| d.action == Some(advisor_core::types::TradeAction::Buy)));
    }

    #[tokio::test]
    async fn test_fetch_failures_are_retried_until_data_arrives() {
        let feed = Arc::new(ScriptedFeed::failing_first(3));
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool = Arc::new(
            WorkerPool::new(config(&["EURUSD"]), feed, dispatch.clone(), None).unwrap(),
        );
        let health = pool.health();

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(200)).await;
        handle.await.unwrap();

        // The worker survived the outage and completed cycles afterwards
        let snapshot = health.get("EURUSD").unwrap();
        assert!(snapshot.cycles_completed >= 1);
        assert_eq!(snapshot.consecutive_fetch_failures, 0);
        assert!(!dispatch.decisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_worker_does_not_stop_siblings() {
        let feed = Arc::new(ScriptedFeed::panicking_on("BADSYM"));
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool = Arc::new(
            WorkerPool::new(config(&["BADSYM", "EURUSD"]), feed, dispatch.clone(), None).unwrap(),
        );
        let health = pool.health();

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(100)).await;
        handle.await.unwrap();

        // The healthy worker kept cycling after its sibling died
        assert!(health.get("EURUSD").unwrap().cycles_completed >= 2);
        assert!(dispatch
            .decisions
            .lock()
            .unwrap()
            .iter()
            .all(|d| d.symbol == "EURUSD"));
    }

    #[tokio::test]
    async fn test_workers_reach_stopped_phase_on_shutdown() {
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        let pool = Arc::new(
            WorkerPool::new(config(&["EURUSD", "USDJPY"]), feed, dispatch, None).unwrap(),
        );
        let health = pool.health();

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(60)).await;
        handle.await.unwrap();

        for symbol in ["EURUSD", "USDJPY"] {
            assert_eq!(health.get(symbol).unwrap().phase, WorkerPhase::Stopped);
        }
    }

    #[tokio::test]
    async fn test_undersized_pool_serves_only_the_queue_head() {
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        let mut cfg = config(&["EURUSD", "USDJPY", "GBPUSD"]);
        cfg.pool_size = 2;
        let pool = Arc::new(WorkerPool::new(cfg, feed, dispatch, None).unwrap());
        let health = pool.health();

        let handle = run_pool_for(Arc::clone(&pool), Duration::from_millis(60)).await;
        handle.await.unwrap();

        // FIFO: the first two symbols get workers, the tail is stranded
        assert!(health.get("EURUSD").unwrap().cycles_completed >= 1);
        assert!(health.get("USDJPY").unwrap().cycles_completed >= 1);
        assert!(health.get("GBPUSD").is_none());
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut cfg = config(&["EURUSD"]);
        cfg.pool_size = 0;
        let feed = Arc::new(ScriptedFeed::new());
        let dispatch = Arc::new(RecordingDispatch::default());
        assert!(WorkerPool::new(cfg, feed, dispatch, None).is_err());
    }
}
