//! Payload to entity mappers

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use super::payloads::{CommentPayload, IdeaPayload, VoteUpdatePayload};
use crate::entities::{Comment, Idea, ReactionCounts, ReactionKind};
use crate::events::RemoteEvent;
use crate::value_objects::IdeaId;

/// Parse a backend timestamp (RFC 3339 string or epoch seconds)
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            let whole = secs.trunc() as i64;
            let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
            DateTime::from_timestamp(whole, nanos)
        }
        _ => None,
    }
}

/// Map a wire count table, skipping unknown kinds and clamping negatives
pub fn counts_from_wire(raw: &BTreeMap<String, i64>) -> ReactionCounts {
    raw.iter()
        .filter_map(|(name, &count)| match name.parse::<ReactionKind>() {
            Ok(kind) => Some((kind, u32::try_from(count.max(0)).unwrap_or(u32::MAX))),
            Err(_) => {
                tracing::debug!(kind = %name, "Skipping unknown reaction kind");
                None
            }
        })
        .collect()
}

impl From<IdeaPayload> for Idea {
    fn from(p: IdeaPayload) -> Self {
        let my_reaction = p
            .user_reaction
            .as_deref()
            .and_then(|name| name.parse::<ReactionKind>().ok());

        Self {
            id: IdeaId::new(p.id),
            title: p.title,
            description: p.description,
            score: p.score,
            upvote_count: p.upvote_count,
            author_name: p.author_name,
            created_at: p.created_at.as_ref().and_then(parse_timestamp),
            reaction_counts: counts_from_wire(&p.reaction_counts),
            my_reaction,
            voted: p.voted_by_you,
        }
    }
}

impl From<&Idea> for IdeaPayload {
    fn from(idea: &Idea) -> Self {
        Self {
            id: idea.id.into_inner(),
            title: idea.title.clone(),
            description: idea.description.clone(),
            score: idea.score,
            upvote_count: idea.upvote_count,
            created_at: idea.created_at.map(|dt| Value::String(dt.to_rfc3339())),
            author_name: idea.author_name.clone(),
            voted_by_you: idea.voted,
            user_reaction: idea.my_reaction.map(|k| k.as_str().to_string()),
            reaction_counts: idea
                .reaction_counts
                .iter()
                .map(|(kind, count)| (kind.as_str().to_string(), i64::from(count)))
                .collect(),
        }
    }
}

impl From<CommentPayload> for Comment {
    fn from(p: CommentPayload) -> Self {
        Self {
            id: p.id,
            idea_id: IdeaId::new(p.idea_id),
            author_name: p.author_name,
            content: p.content,
            created_at: p
                .created_at
                .as_ref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
        }
    }
}

impl From<&Comment> for CommentPayload {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id,
            content: c.content.clone(),
            author_name: c.author_name.clone(),
            idea_id: c.idea_id.into_inner(),
            created_at: Some(Value::String(c.created_at.to_rfc3339())),
        }
    }
}

impl From<VoteUpdatePayload> for RemoteEvent {
    fn from(p: VoteUpdatePayload) -> Self {
        Self::VoteUpdate {
            idea_id: IdeaId::new(p.idea_id),
            score: p.score,
            upvote_count: p.upvote_count,
        }
    }
}
