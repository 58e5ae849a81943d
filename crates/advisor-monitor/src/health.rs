//! Per-worker health reporting.
//!
//! Workers publish their cycle phase and fetch-failure streak here so an
//! operator can see which symbols are healthy and which are stuck in
//! backoff, without parsing the log stream.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// The phase a worker's polling loop is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPhase {
    Idle,
    Fetching,
    Computing,
    Deciding,
    Dispatching,
    Sleeping,
    Stopped,
}

/// Health snapshot for one worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerHealth {
    /// Current loop phase
    pub phase: WorkerPhase,
    /// Fetch failures since the last successful fetch
    pub consecutive_fetch_failures: u32,
    /// Completed fetch-to-dispatch cycles
    pub cycles_completed: u64,
    /// Unix milliseconds of the last phase transition
    pub last_transition_ms: i64,
}

impl WorkerHealth {
    fn new() -> Self {
        Self {
            phase: WorkerPhase::Idle,
            consecutive_fetch_failures: 0,
            cycles_completed: 0,
            last_transition_ms: Utc::now().timestamp_millis(),
        }
    }
}

/// Shared registry of worker health, keyed by symbol.
#[derive(Debug, Default)]
pub struct HealthRegistry {
    inner: Mutex<HashMap<String, WorkerHealth>>,
}

impl HealthRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a phase transition for a symbol's worker.
    pub fn set_phase(&self, symbol: &str, phase: WorkerPhase) {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner
            .entry(symbol.to_string())
            .or_insert_with(WorkerHealth::new);
        entry.phase = phase;
        entry.last_transition_ms = Utc::now().timestamp_millis();
    }

    /// Record a fetch failure and return the current streak length.
    pub fn record_fetch_failure(&self, symbol: &str) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner
            .entry(symbol.to_string())
            .or_insert_with(WorkerHealth::new);
        entry.consecutive_fetch_failures += 1;
        entry.consecutive_fetch_failures
    }

    /// Reset the failure streak after a successful fetch.
    pub fn clear_fetch_failures(&self, symbol: &str) {
        if let Some(entry) = self.inner.lock().unwrap().get_mut(symbol) {
            entry.consecutive_fetch_failures = 0;
        }
    }

    /// Record one completed cycle.
    pub fn record_cycle(&self, symbol: &str) {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner
            .entry(symbol.to_string())
            .or_insert_with(WorkerHealth::new);
        entry.cycles_completed += 1;
    }

    /// Get the health of one worker.
    pub fn get(&self, symbol: &str) -> Option<WorkerHealth> {
        self.inner.lock().unwrap().get(symbol).cloned()
    }

    /// Snapshot the whole registry.
    pub fn snapshot(&self) -> HashMap<String, WorkerHealth> {
        self.inner.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let registry = HealthRegistry::new();
        registry.set_phase("EURUSD", WorkerPhase::Fetching);
        registry.set_phase("EURUSD", WorkerPhase::Sleeping);

        assert_eq!(registry.get("EURUSD").unwrap().phase, WorkerPhase::Sleeping);
        assert!(registry.get("USDJPY").is_none());
    }

    #[test]
    fn test_failure_streak() {
        let registry = HealthRegistry::new();
        assert_eq!(registry.record_fetch_failure("EURUSD"), 1);
        assert_eq!(registry.record_fetch_failure("EURUSD"), 2);

        registry.clear_fetch_failures("EURUSD");
        assert_eq!(
            registry.get("EURUSD").unwrap().consecutive_fetch_failures,
            0
        );
    }

    #[test]
    fn test_cycle_counter_is_per_symbol() {
        let registry = HealthRegistry::new();
        registry.record_cycle("EURUSD");
        registry.record_cycle("EURUSD");
        registry.record_cycle("USDJPY");

        assert_eq!(registry.get("EURUSD").unwrap().cycles_completed, 2);
        assert_eq!(registry.get("USDJPY").unwrap().cycles_completed, 1);
    }
}
