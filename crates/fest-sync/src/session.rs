//! Sync session - drains the inbound event queue into the synchronizer
//!
//! The transport only pushes into the queue; reconnects and decoding never
//! touch the cache directly.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use fest_core::{IdeaId, RemoteEvent, RemoteEventType};

use crate::synchronizer::CounterSynchronizer;

/// Summary of one applied event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedEvent {
    pub event_type: RemoteEventType,
    pub idea_id: IdeaId,
    /// Whether the cache changed
    pub changed: bool,
}

/// Owns the receiving end of the event queue
pub struct SyncSession {
    sync: Arc<CounterSynchronizer>,
    events: mpsc::Receiver<RemoteEvent>,
}

impl SyncSession {
    pub fn new(sync: Arc<CounterSynchronizer>, events: mpsc::Receiver<RemoteEvent>) -> Self {
        Self { sync, events }
    }

    /// Create a session together with the sender the transport pushes into
    pub fn channel(sync: Arc<CounterSynchronizer>, buffer: usize) -> (Self, mpsc::Sender<RemoteEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(sync, rx), tx)
    }

    pub fn synchronizer(&self) -> &Arc<CounterSynchronizer> {
        &self.sync
    }

    /// Apply events in arrival order until the queue closes or the synchronizer is disposed
    ///
    /// Returns the number of events that changed the cache.
    pub async fn run(self) -> usize {
        self.run_with(|_| {}).await
    }

    /// Like `run`, reporting every event to `on_event` after it is applied
    pub async fn run_with<F>(mut self, mut on_event: F) -> usize
    where
        F: FnMut(AppliedEvent),
    {
        let mut changed = 0;

        loop {
            let event = tokio::select! {
                event = self.events.recv() => event,
                () = self.sync.disposed() => None,
            };
            let Some(event) = event else { break };

            let applied = AppliedEvent {
                event_type: event.event_type(),
                idea_id: event.idea_id(),
                changed: self.sync.apply_remote_event(event),
            };
            if applied.changed {
                changed += 1;
            }
            debug!(event = %applied.event_type, idea_id = %applied.idea_id, changed = applied.changed, "Event processed");
            on_event(applied);
        }

        info!(changed, "Sync session ended");
        changed
    }
}
