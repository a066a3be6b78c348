//! Caller-side handle to a running listener

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fest_core::traits::TopicSubscriber;
use fest_core::{DomainResult, IdeaId};
use tokio::sync::{mpsc, RwLock};

use super::unavailable;
use crate::protocol::ChannelMessage;

/// Commands for the background listener
#[derive(Debug)]
pub(crate) enum Command {
    Send(ChannelMessage),
    Shutdown,
}

/// Handle to a live channel connection
///
/// Dropping every clone of the handle stops the listener.
#[derive(Debug, Clone)]
pub struct RealtimeHandle {
    control_tx: mpsc::Sender<Command>,
    /// Topics re-joined after a reconnect
    joined: Arc<RwLock<HashSet<IdeaId>>>,
    connected: Arc<AtomicBool>,
}

impl RealtimeHandle {
    pub(crate) fn new(control_tx: mpsc::Sender<Command>) -> Self {
        Self {
            control_tx,
            joined: Arc::new(RwLock::new(HashSet::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    pub(crate) fn joined(&self) -> &Arc<RwLock<HashSet<IdeaId>>> {
        &self.joined
    }

    pub(crate) fn connected_flag(&self) -> &Arc<AtomicBool> {
        &self.connected
    }

    /// Whether the socket is currently open
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Ideas currently joined
    pub async fn joined_topics(&self) -> Vec<IdeaId> {
        let mut topics: Vec<IdeaId> = self.joined.read().await.iter().copied().collect();
        topics.sort();
        topics
    }

    /// Close the socket and stop the listener
    pub async fn close(&self) {
        if self.control_tx.send(Command::Shutdown).await.is_err() {
            tracing::debug!("Listener already stopped");
        }
    }

    async fn send(&self, message: ChannelMessage) -> DomainResult<()> {
        self.control_tx
            .send(Command::Send(message))
            .await
            .map_err(|_| unavailable("real-time channel closed"))
    }
}

#[async_trait]
impl TopicSubscriber for RealtimeHandle {
    async fn join(&self, idea_id: IdeaId) -> DomainResult<()> {
        self.joined.write().await.insert(idea_id);
        self.send(ChannelMessage::join(idea_id)).await?;
        tracing::debug!(topic = %idea_id.topic(), "Joined topic");
        Ok(())
    }

    async fn leave(&self, idea_id: IdeaId) -> DomainResult<()> {
        self.joined.write().await.remove(&idea_id);
        self.send(ChannelMessage::leave(idea_id)).await?;
        tracing::debug!(topic = %idea_id.topic(), "Left topic");
        Ok(())
    }
}
