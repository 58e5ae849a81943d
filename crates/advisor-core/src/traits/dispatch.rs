//! Trade dispatch trait definition.

use crate::error::DispatchError;
use crate::types::TradeDecision;
use async_trait::async_trait;
use uuid::Uuid;

/// Acknowledgement of a dispatched decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAck {
    /// Identifier assigned by the dispatch collaborator
    pub id: Uuid,
}

/// Trait for the trade dispatch collaborator.
///
/// The engine treats dispatch as fire-and-forget within a cycle: a failed
/// dispatch is logged and not retried until the next cycle produces a new
/// decision.
#[async_trait]
pub trait TradeDispatch: Send + Sync {
    /// Forward a decision carrying a Buy or Sell action.
    ///
    /// Callers only invoke this for actionable decisions; passing a
    /// decision with no action is a `DispatchError::Rejected`.
    async fn dispatch(&self, decision: &TradeDecision) -> Result<DispatchAck, DispatchError>;

    /// Get the dispatcher name.
    fn name(&self) -> &str;
}
