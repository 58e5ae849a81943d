//! Symbol polling scheduler.
//!
//! A fixed pool of workers drains the symbol queue once at startup; each
//! worker keeps its symbol and loops fetch → compute → decide → dispatch →
//! sleep until shutdown. Failures are isolated at the worker boundary.

mod pool;
mod queue;
mod worker;

pub use pool::{SchedulerConfig, WorkerPool};
pub use queue::SymbolQueue;
