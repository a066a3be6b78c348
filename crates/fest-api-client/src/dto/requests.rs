//! Request bodies sent to the REST API
//!
//! Bodies also derive `Deserialize` so test backends can decode them.

use fest_core::{IdeaDraft, IdeaId, ReactionKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /api/ideas/{id}/vote`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "ideaId")]
    pub idea_id: i64,
    pub vote: i32,
}

impl VoteRequest {
    /// Upvote body; the server toggles when a vote already exists
    pub fn upvote(idea_id: IdeaId) -> Self {
        Self {
            idea_id: idea_id.into_inner(),
            vote: 1,
        }
    }
}

/// `POST /api/ideas/{id}/react`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactRequest {
    pub reaction: ReactionKind,
}

/// `POST /api/ideas/{id}/comments`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

/// `POST /api/ideas`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdeaRequest {
    pub title: String,
    pub description: String,
}

impl From<&IdeaDraft> for CreateIdeaRequest {
    fn from(draft: &IdeaDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
        }
    }
}
