//! Payload definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Idea as sent by the list/create endpoints and the `idea_created` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaPayload {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default, rename = "upvoteCount", alias = "upvote_count")]
    pub upvote_count: i64,
    /// ISO-8601 string or epoch seconds, depending on the backend serializer
    #[serde(default, rename = "createdAt", alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, alias = "authorName", skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, alias = "userVoted", alias = "voted")]
    pub voted_by_you: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reaction: Option<String>,
    #[serde(default)]
    pub reaction_counts: BTreeMap<String, i64>,
}

/// Comment as sent by the comment endpoints and the `new_comment` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub author_name: String,
    pub idea_id: i64,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
}

/// `vote_update` event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteUpdatePayload {
    pub idea_id: i64,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_count: Option<i64>,
}
