//! Live polling command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use advisor_dispatch::{PaperDispatcher, TracingNotifier};
use advisor_scheduler::{SchedulerConfig, WorkerPool};
use advisor_signal::Thresholds;

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config = super::load(config_path)?;
    let engine = &config.engine;

    let symbols = if args.symbols.is_empty() {
        engine.symbols.clone()
    } else {
        args.symbols.clone()
    };
    let pool_size = args.pool_size.unwrap_or(engine.pool_size);

    let feed = super::build_feed(engine, &config.data.bars_dir, args.data.as_ref())?;
    let dispatcher = Arc::new(PaperDispatcher::new());

    let scheduler_config = SchedulerConfig {
        symbols,
        pool_size,
        fast_period: engine.fast_period,
        slow_period: engine.slow_period,
        poll_interval: Duration::from_secs(engine.poll_interval_secs),
        retry_delay: Duration::from_secs(engine.retry_delay_secs),
        max_retry_delay: Duration::from_secs(engine.max_retry_delay_secs),
        thresholds: Thresholds {
            wide: engine.threshold_wide,
            narrow: engine.threshold_narrow,
        },
    };

    let pool = Arc::new(
        WorkerPool::new(
            scheduler_config,
            Arc::new(feed),
            Arc::clone(&dispatcher) as Arc<dyn advisor_core::traits::TradeDispatch>,
            Some(Arc::new(TracingNotifier)),
        )
        .context("failed to start the worker pool")?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ctrl-C flips the shutdown flag; workers stop at their next check
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    // Periodic health report while the pool runs
    let health = pool.health();
    let report_interval = Duration::from_secs(engine.poll_interval_secs);
    let mut report_rx = shutdown_rx.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(report_interval) => {}
                _ = report_rx.changed() => {
                    if *report_rx.borrow() {
                        break;
                    }
                }
            }
            for (symbol, snapshot) in health.snapshot() {
                let entry = format!(
                    "phase={:?} cycles={} failures={}",
                    snapshot.phase, snapshot.cycles_completed, snapshot.consecutive_fetch_failures
                );
                if snapshot.consecutive_fetch_failures > 0 {
                    warn!(symbol = %symbol, %entry, "worker degraded");
                } else {
                    info!(symbol = %symbol, %entry, "worker healthy");
                }
            }
        }
    });

    pool.run(shutdown_rx).await?;

    let records = dispatcher.records();
    info!(dispatched = records.len(), "engine stopped");
    Ok(())
}
