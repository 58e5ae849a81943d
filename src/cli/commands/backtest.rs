//! Backtest command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use advisor_core::traits::DataFeed;
use advisor_indicators::MaCrossover;
use advisor_signal::{run_backtest, EntryLevelConfig, EntryLevelIdentifier, Thresholds};

use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let config = super::load(config_path)?;
    let engine = &config.engine;

    info!(symbol = %args.symbol, "starting backtest");

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

    let bars = feed
        .fetch_multi_timeframe(&args.symbol)
        .await
        .with_context(|| format!("failed to load bars for {}", args.symbol))?;
    let htf = calculator.annotate(&bars.htf)?;
    let ltf = calculator.annotate(&bars.ltf)?;

    let levels = identifier.identify(&args.symbol, &htf, &ltf);
    let report = run_backtest(&ltf, &levels);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("Backtest: {}", args.symbol);
            println!("  Bars:            {}", report.rows.len());
            println!("  Entries:         {}", report.entries);
            println!(
                "  Market return:   {:+.2}%",
                (report.final_market - 1.0) * 100.0
            );
            println!(
                "  Strategy return: {:+.2}%",
                (report.final_strategy - 1.0) * 100.0
            );
        }
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, serde_json::to_string_pretty(&report)?)?;
        info!("results saved to {:?}", save_path);
    }

    Ok(())
}
