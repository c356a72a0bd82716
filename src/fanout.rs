//! Outbound notification fan-out.
//!
//! Publishing never blocks the engine: the broadcast channel drops the oldest
//! messages for receivers that fall behind.

use crate::state::RoundInfo;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// A notification for every participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outbound {
    /// Plain system text ("New round starting in 5.00s!").
    #[serde(rename = "system")]
    System(String),
    /// Fresh round projection.
    #[serde(rename = "setinfo")]
    SetInfo(RoundInfo),
}

/// Fire-and-forget publisher.
pub trait Fanout: Send + Sync {
    fn publish(&self, msg: Outbound);
}

/// [`Fanout`] over a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastFanout {
    tx: broadcast::Sender<Outbound>,
}

impl BroadcastFanout {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.tx.subscribe()
    }
}

impl Fanout for BroadcastFanout {
    fn publish(&self, msg: Outbound) {
        if self.tx.send(msg).is_err() {
            trace!("No subscribers for outbound message");
        }
    }
}
