//! Idea identifier - server-assigned 64-bit id

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of an idea
///
/// Serialized as a plain JSON number, which is what the backend sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(i64);

impl IdeaId {
    /// Create an IdeaId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Real-time topic name for this idea (`idea_<id>`)
    pub fn topic(&self) -> String {
        format!("idea_{}", self.0)
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, IdeaIdParseError> {
        s.trim()
            .parse::<i64>()
            .map(IdeaId)
            .map_err(|_| IdeaIdParseError::InvalidFormat)
    }
}

/// Error when parsing an IdeaId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdeaIdParseError {
    #[error("invalid idea id format")]
    InvalidFormat,
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdeaId {
    type Err = IdeaIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for IdeaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<IdeaId> for i64 {
    fn from(id: IdeaId) -> Self {
        id.0
    }
}
