//! Idea entity - cached snapshot of one community-submitted idea

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use validator::Validate;

use super::reaction::{ReactionCounts, ReactionKind};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::IdeaId;

/// Idea snapshot as held in the client cache
///
/// `score` and `upvote_count` are computed by the server; the client only
/// ever overwrites them with server values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub description: String,
    pub score: i64,
    pub upvote_count: i64,
    pub author_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub reaction_counts: ReactionCounts,
    /// Viewer's active reaction
    pub my_reaction: Option<ReactionKind>,
    /// Whether the viewer has voted
    pub voted: bool,
}

impl Idea {
    /// Create a fresh idea with no engagement
    pub fn new(id: IdeaId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            score: 0,
            upvote_count: 0,
            author_name: None,
            created_at: None,
            reaction_counts: ReactionCounts::new(),
            my_reaction: None,
            voted: false,
        }
    }

    /// Overwrite the server-computed vote figures
    pub fn apply_vote_stats(&mut self, score: i64, upvote_count: Option<i64>) {
        self.score = score;
        if let Some(count) = upvote_count {
            self.upvote_count = count;
        }
    }

    /// The viewer's own reaction is reflected in the counts
    pub fn reaction_is_counted(&self) -> bool {
        self.my_reaction
            .is_none_or(|kind| self.reaction_counts.get(kind) >= 1)
    }
}

/// Ordering of the idea list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest score first
    #[default]
    Popular,
    /// Highest id (most recent) first
    Newest,
}

impl SortOrder {
    pub fn compare(self, a: &Idea, b: &Idea) -> Ordering {
        match self {
            Self::Popular => b.score.cmp(&a.score),
            Self::Newest => b.id.cmp(&a.id),
        }
    }
}

/// New idea submission
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct IdeaDraft {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(min = 20, max = 500, message = "Description must be 20-500 characters"))]
    pub description: String,
}

impl IdeaDraft {
    /// Build a draft from raw input, trimming and validating it
    pub fn new(title: &str, description: &str) -> DomainResult<Self> {
        let draft = Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
        };
        draft
            .validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        Ok(draft)
    }
}
