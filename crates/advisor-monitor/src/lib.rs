//! Monitoring: logging setup and per-worker health reporting.

mod health;
mod logging;

pub use health::{HealthRegistry, WorkerHealth, WorkerPhase};
pub use logging::setup_logging;
