//! Port traits for the remote API and the real-time channel
//!
//! The synchronizer defines what it needs; `fest-api-client` and
//! `fest-realtime` provide the implementations.

use async_trait::async_trait;

use crate::entities::{Comment, Idea, IdeaDraft, ReactionCounts, ReactionKind};
use crate::error::DomainResult;
use crate::value_objects::{Credential, IdeaId};

/// Authoritative outcome of a vote toggle
///
/// `score` is `None` when a successful response carried no stats; the cached
/// score is then left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteResult {
    pub score: Option<i64>,
}

/// Authoritative outcome of a reaction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionResult {
    /// The call cleared the viewer's reaction
    pub removed: bool,
    /// Server counts; `None` keeps the optimistic counts
    pub counts: Option<ReactionCounts>,
}

// ============================================================================
// Remote API
// ============================================================================

#[async_trait]
pub trait IdeaApi: Send + Sync {
    /// List ideas, enriched with the viewer's vote and reaction when a credential is given
    async fn list_ideas(&self, credential: Option<&Credential>) -> DomainResult<Vec<Idea>>;

    /// Toggle the viewer's vote on an idea
    async fn toggle_vote(&self, idea_id: IdeaId, credential: &Credential) -> DomainResult<VoteResult>;

    /// Set, switch, or clear the viewer's reaction
    async fn set_reaction(
        &self,
        idea_id: IdeaId,
        kind: ReactionKind,
        credential: &Credential,
    ) -> DomainResult<ReactionResult>;

    /// List comments on an idea in creation order
    async fn list_comments(&self, idea_id: IdeaId) -> DomainResult<Vec<Comment>>;

    /// Post a comment; the server assigns id and timestamp
    async fn create_comment(
        &self,
        idea_id: IdeaId,
        content: &str,
        credential: &Credential,
    ) -> DomainResult<Comment>;

    /// Submit a new idea
    async fn create_idea(&self, draft: &IdeaDraft, credential: &Credential) -> DomainResult<Idea>;
}

// ============================================================================
// Real-time topics
// ============================================================================

/// Per-idea topic subscription on the real-time channel
#[async_trait]
pub trait TopicSubscriber: Send + Sync {
    /// Start receiving events scoped to an idea
    async fn join(&self, idea_id: IdeaId) -> DomainResult<()>;

    /// Stop receiving events scoped to an idea
    async fn leave(&self, idea_id: IdeaId) -> DomainResult<()>;
}

/// Subscriber used when no live channel is available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSubscriber;

#[async_trait]
impl TopicSubscriber for NoopSubscriber {
    async fn join(&self, idea_id: IdeaId) -> DomainResult<()> {
        tracing::debug!(idea_id = %idea_id, "No live channel, join skipped");
        Ok(())
    }

    async fn leave(&self, idea_id: IdeaId) -> DomainResult<()> {
        tracing::debug!(idea_id = %idea_id, "No live channel, leave skipped");
        Ok(())
    }
}
