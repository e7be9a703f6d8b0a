use crate::feed::Reading;
use tokio::sync::broadcast;

/// In-process fan-out between the ingestion boundary and its subscribers.
///
/// One long-lived sender side is owned by the service; every consumer (SSE
/// client, session tracker) takes its own receiver handle and unregisters by
/// dropping it. There is no shared global subscription state.
#[derive(Debug, Clone)]
pub struct ReadingBus {
    tx: broadcast::Sender<Reading>,
}

impl ReadingBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes a reading. With no subscribers attached the reading is
    /// discarded, matching the fire-and-forget ingest contract.
    pub fn publish(&self, reading: Reading) {
        let _ = self.tx.send(reading);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Reading> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
