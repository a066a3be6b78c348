//! Channel message format

use fest_core::wire::{CommentPayload, IdeaPayload, VoteUpdatePayload};
use fest_core::{Comment, Idea, IdeaId, RemoteEvent, RemoteEventType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound event asking the server to route an idea's events to us
pub const JOIN_IDEA: &str = "join_idea";
/// Outbound event undoing `join_idea`
pub const LEAVE_IDEA: &str = "leave_idea";

/// A single frame on the real-time channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Event name
    pub event: String,

    /// Event payload
    #[serde(default)]
    pub data: Value,
}

/// Why an inbound frame could not be turned into a `RemoteEvent`
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not a channel message: {0}")]
    Frame(#[source] serde_json::Error),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("bad {event} payload: {source}")]
    Payload {
        event: RemoteEventType,
        #[source]
        source: serde_json::Error,
    },
}

impl ChannelMessage {
    /// Create a message with an arbitrary event name
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    // === Client Messages ===

    /// Subscribe to an idea's topic
    #[must_use]
    pub fn join(idea_id: IdeaId) -> Self {
        Self::new(JOIN_IDEA, Value::from(idea_id.into_inner()))
    }

    /// Unsubscribe from an idea's topic
    #[must_use]
    pub fn leave(idea_id: IdeaId) -> Self {
        Self::new(LEAVE_IDEA, Value::from(idea_id.into_inner()))
    }

    // === Server Messages ===

    /// Build the frame the server sends for a remote event
    #[must_use]
    pub fn from_event(event: &RemoteEvent) -> Self {
        let data = match event {
            RemoteEvent::VoteUpdate {
                idea_id,
                score,
                upvote_count,
            } => serde_json::to_value(VoteUpdatePayload {
                idea_id: idea_id.into_inner(),
                score: *score,
                upvote_count: *upvote_count,
            }),
            RemoteEvent::IdeaCreated { idea } => serde_json::to_value(IdeaPayload::from(idea.as_ref())),
            RemoteEvent::NewComment { comment, .. } => {
                serde_json::to_value(CommentPayload::from(comment))
            }
        }
        .unwrap_or_default();

        Self::new(event.event_type().as_str(), data)
    }

    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError::Frame)
    }

    /// Serialize to a text frame
    #[must_use]
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// If this is a join/leave request, the idea it targets
    #[must_use]
    pub fn topic_request(&self) -> Option<(bool, IdeaId)> {
        let joining = match self.event.as_str() {
            JOIN_IDEA => true,
            LEAVE_IDEA => false,
            _ => return None,
        };
        self.data.as_i64().map(|id| (joining, IdeaId::new(id)))
    }

    /// Decode into a domain event
    pub fn into_remote_event(self) -> Result<RemoteEvent, DecodeError> {
        let event_type = RemoteEventType::from_str(&self.event)
            .ok_or_else(|| DecodeError::UnknownEvent(self.event.clone()))?;
        let payload_error = |source| DecodeError::Payload {
            event: event_type,
            source,
        };

        match event_type {
            RemoteEventType::VoteUpdate => {
                let payload: VoteUpdatePayload =
                    serde_json::from_value(self.data).map_err(payload_error)?;
                Ok(RemoteEvent::from(payload))
            }
            RemoteEventType::IdeaCreated => {
                let payload: IdeaPayload =
                    serde_json::from_value(self.data).map_err(payload_error)?;
                Ok(RemoteEvent::IdeaCreated {
                    idea: Box::new(Idea::from(payload)),
                })
            }
            RemoteEventType::NewComment => {
                let payload: CommentPayload =
                    serde_json::from_value(self.data).map_err(payload_error)?;
                let comment = Comment::from(payload);
                Ok(RemoteEvent::NewComment {
                    idea_id: comment.idea_id,
                    comment,
                })
            }
        }
    }
}
