//! Remote events - mutations made by other clients, delivered by push
//!
//! Events are applied to the cache in arrival order. None of them carry a
//! version, so a late `VoteUpdate` overwrites whatever the cache holds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Comment, Idea};
use crate::value_objects::IdeaId;

/// Names of the inbound events on the real-time channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteEventType {
    /// Score changed on an idea
    VoteUpdate,
    /// A new idea was submitted
    IdeaCreated,
    /// A comment was posted on an idea
    NewComment,
}

impl RemoteEventType {
    /// Get the wire name of the event
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VoteUpdate => "vote_update",
            Self::IdeaCreated => "idea_created",
            Self::NewComment => "new_comment",
        }
    }

    /// Parse an event name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "vote_update" => Some(Self::VoteUpdate),
            "idea_created" => Some(Self::IdeaCreated),
            "new_comment" => Some(Self::NewComment),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded push event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    VoteUpdate {
        idea_id: IdeaId,
        score: i64,
        upvote_count: Option<i64>,
    },
    IdeaCreated {
        idea: Box<Idea>,
    },
    NewComment {
        idea_id: IdeaId,
        comment: Comment,
    },
}

impl RemoteEvent {
    /// Get the event type
    pub fn event_type(&self) -> RemoteEventType {
        match self {
            Self::VoteUpdate { .. } => RemoteEventType::VoteUpdate,
            Self::IdeaCreated { .. } => RemoteEventType::IdeaCreated,
            Self::NewComment { .. } => RemoteEventType::NewComment,
        }
    }

    /// Idea the event is about
    pub fn idea_id(&self) -> IdeaId {
        match self {
            Self::VoteUpdate { idea_id, .. } | Self::NewComment { idea_id, .. } => *idea_id,
            Self::IdeaCreated { idea } => idea.id,
        }
    }
}
