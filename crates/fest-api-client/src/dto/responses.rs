//! Response bodies returned by the REST API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{"data": [...]}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// `{"data": {...}}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Vote toggle response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<VoteStats>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteStats {
    pub score: i64,
}

/// Reaction response
///
/// The server sets exactly one of `added`, `updated`, `removed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionResponse {
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub added: bool,
    #[serde(default)]
    pub updated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_counts: Option<BTreeMap<String, i64>>,
}

/// Error body `{"error": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
