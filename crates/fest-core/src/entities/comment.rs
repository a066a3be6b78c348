//! Comment entity - append-only discussion entry on an idea

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};
use crate::value_objects::IdeaId;

/// Default upper bound on comment length, in characters
pub const DEFAULT_COMMENT_MAX_LENGTH: usize = 2000;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub idea_id: IdeaId,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: i64, idea_id: IdeaId, author_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            idea_id,
            author_name: author_name.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Check whether the given display name wrote this comment
    pub fn is_by(&self, author_name: &str) -> bool {
        self.author_name == author_name
    }
}

/// Trim comment input and check it against the length bound
///
/// Returns the trimmed text that should be sent to the server.
pub fn normalize_comment(text: &str, max_len: usize) -> DomainResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("comment is empty".to_string()));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::ContentTooLong { max: max_len });
    }
    Ok(trimmed.to_string())
}
