//! Notification trait definition.

use async_trait::async_trait;

/// Optional human-readable status channel.
///
/// Implementations must not block the calling worker; delivery is
/// best-effort and failures are swallowed by the implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send an informational message.
    async fn notify(&self, message: &str);
}
