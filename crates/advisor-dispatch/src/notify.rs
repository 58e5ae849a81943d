//! Notification adapter onto the log stream.

use async_trait::async_trait;
use tracing::info;

use advisor_core::traits::Notifier;

/// Forwards informational messages to `tracing`.
///
/// Stands in for an external chat-style channel; never blocks and never
/// fails the caller.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, message: &str) {
        info!(target: "advisor::notify", "{message}");
    }
}
