//! Subscriber Hub
//!
//! Thin wrapper over `tokio::sync::broadcast`. The channel is bounded: a
//! session that stops draining its receiver eventually observes
//! `RecvError::Lagged` and is closed by its session loop, while `notify`
//! itself never waits on anyone.

use tokio::sync::broadcast;

use super::types::RankingUpdate;

/// Buffered updates per subscriber before a slow one is considered lagged.
pub const SUBSCRIBER_BUFFER: usize = 32;

pub struct BroadcastHub {
    tx: broadcast::Sender<RankingUpdate>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SUBSCRIBER_BUFFER);
        Self { tx }
    }

    /// Opens a new subscription. The receiver yields updates in publish order
    /// until the subscriber unsubscribes (drops it) or falls too far behind.
    pub fn subscribe(&self) -> broadcast::Receiver<RankingUpdate> {
        self.tx.subscribe()
    }

    /// Pushes one update to every live subscriber without blocking. Returns
    /// how many subscribers the update reached.
    pub fn notify(&self, update: RankingUpdate) -> usize {
        match self.tx.send(update) {
            Ok(reached) => reached,
            // No subscribers connected; nothing to deliver
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
