//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match advisor_config::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = advisor_config::validate(&config) {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbols: {}", config.engine.symbols.join(", "));
    println!(
        "Moving averages: {}/{} on {} with {} entries",
        config.engine.fast_period, config.engine.slow_period, config.engine.htf, config.engine.ltf
    );
    println!("Poll interval: {}s", config.engine.poll_interval_secs);
    println!("Worker pool size: {}", config.engine.pool_size);

    Ok(())
}
