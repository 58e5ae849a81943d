//! Collaborator traits at the engine's seams.

mod data_feed;
mod dispatch;
mod notifier;

pub use data_feed::{DataFeed, MultiTimeframeBars};
pub use dispatch::{DispatchAck, TradeDispatch};
pub use notifier::Notifier;
