//! The shared one-shot symbol queue.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Thread-safe queue of symbols, drained once per process run.
///
/// Each symbol is handed out at most once; workers keep their dequeued
/// symbol for the life of their polling loop and never re-enqueue it.
/// Mutual exclusion is only needed at dequeue time.
#[derive(Debug)]
pub struct SymbolQueue {
    inner: Mutex<VecDeque<String>>,
}

impl SymbolQueue {
    /// Create a queue from the configured symbol list.
    pub fn new(symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner: Mutex::new(symbols.into_iter().collect()),
        }
    }

    /// Take the next symbol, or None when the queue is drained.
    pub fn dequeue(&self) -> Option<String> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Remaining symbols.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the queue is drained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
