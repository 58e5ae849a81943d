//! Historical entry-level scan command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use advisor_core::traits::DataFeed;
use advisor_data::CsvSignalLog;
use advisor_indicators::MaCrossover;
use advisor_signal::{EntryLevelConfig, EntryLevelIdentifier, Thresholds};

use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config_path: &Path) -> Result<()> {
    let config = super::load(config_path)?;
    let engine = &config.engine;

    let symbols = if args.symbols.is_empty() {
        engine.symbols.clone()
    } else {
        args.symbols.clone()
    };

    let feed = super::build_feed(engine, &config.data.bars_dir, args.data.as_ref())?;
    let calculator = MaCrossover::new(engine.fast_period, engine.slow_period)?;
    let identifier = EntryLevelIdentifier::new(EntryLevelConfig {
        stop_loss_distance: engine.stop_loss_distance,
        take_profit_distance: engine.take_profit_distance,
        thresholds: Thresholds {
            wide: engine.threshold_wide,
            narrow: engine.threshold_narrow,
        },
    });

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.signals_dir));
    let log = CsvSignalLog::new(&output_dir)?;

    for symbol in &symbols {
        let bars = feed
            .fetch_multi_timeframe(symbol)
            .await
            .with_context(|| format!("failed to load bars for {symbol}"))?;
        let htf = calculator.annotate(&bars.htf)?;
        let ltf = calculator.annotate(&bars.ltf)?;

        let levels = identifier.identify(symbol, &htf, &ltf);
        let actionable = levels.iter().filter(|l| l.is_actionable()).count();
        let path = log.append(symbol, &levels)?;

        info!(
            symbol = %symbol,
            rows = levels.len(),
            actionable,
            "scan complete"
        );
        println!(
            "{symbol}: {} levels ({actionable} actionable) -> {}",
            levels.len(),
            path.display()
        );
    }

    Ok(())
}
