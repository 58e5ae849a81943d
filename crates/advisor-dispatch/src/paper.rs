//! Paper trade dispatcher for simulation and dry runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use advisor_core::error::DispatchError;
use advisor_core::traits::{DispatchAck, TradeDispatch};
use advisor_core::types::{TradeAction, TradeDecision};

/// A dispatched decision as recorded by the paper dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    /// Acknowledgement id returned to the caller
    pub id: Uuid,
    /// Symbol the decision applied to
    pub symbol: String,
    /// Direction of the dispatched decision
    pub action: TradeAction,
    /// Price the decision was evaluated against
    pub reference_price: f64,
    /// Wall-clock receipt time
    pub received_at: DateTime<Utc>,
}

/// Records dispatched decisions instead of forwarding them to a vendor.
pub struct PaperDispatcher {
    records: Arc<Mutex<Vec<DispatchRecord>>>,
}

impl PaperDispatcher {
    /// Create an empty paper dispatcher.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of everything dispatched so far.
    pub fn records(&self) -> Vec<DispatchRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for PaperDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeDispatch for PaperDispatcher {
    async fn dispatch(&self, decision: &TradeDecision) -> Result<DispatchAck, DispatchError> {
        let Some(action) = decision.action else {
            return Err(DispatchError::Rejected(
                "decision carries no action".into(),
            ));
        };

        let record = DispatchRecord {
            id: Uuid::new_v4(),
            symbol: decision.symbol.clone(),
            action,
            reference_price: decision.reference_price,
            received_at: Utc::now(),
        };
        info!(
            symbol = record.symbol,
            %action,
            price = record.reference_price,
            ack = %record.id,
            "paper dispatch accepted"
        );

        let ack = DispatchAck { id: record.id };
        self.records.lock().unwrap().push(record);
        Ok(ack)
    }

    fn name(&self) -> &str {
        "paper"
    }
}
