//! In-process shutdown coordination.
//!
//! Process teardown is signal-driven and immediate (see `signals.rs`);
//! this coordinator exists so the accept loops can also be stopped from
//! inside the process, which is how the integration tests tear a daemon
//! down without exiting.

use tokio::sync::broadcast;

/// Broadcast-channel shutdown coordinator.
///
/// Long-running tasks subscribe at spawn time and stop when the channel
/// fires.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
