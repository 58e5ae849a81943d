//! Dispatch adapters: a paper dispatcher for simulation and a
//! tracing-backed notifier. The vendor order API stays behind the
//! `TradeDispatch` trait.

mod notify;
mod paper;

pub use notify::TracingNotifier;
pub use paper::{DispatchRecord, PaperDispatcher};
