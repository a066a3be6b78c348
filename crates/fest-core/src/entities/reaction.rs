//! Reaction kinds and per-idea reaction counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Emoji-style reaction a viewer can attach to an idea
///
/// A viewer holds at most one active kind per idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    /// Every kind, in display order
    pub const ALL: [Self; 6] = [
        Self::Like,
        Self::Love,
        Self::Haha,
        Self::Wow,
        Self::Sad,
        Self::Angry,
    ];

    /// Wire name of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Love => "LOVE",
            Self::Haha => "HAHA",
            Self::Wow => "WOW",
            Self::Sad => "SAD",
            Self::Angry => "ANGRY",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    /// Case-insensitive parse of the wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| DomainError::Validation(format!("unknown reaction kind: {s}")))
    }
}

/// Reaction counts for one idea, keyed by kind
///
/// Kinds missing from the map count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionCounts(BTreeMap<ReactionKind, u32>);

impl ReactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a kind
    pub fn get(&self, kind: ReactionKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Set the count for a kind
    pub fn set(&mut self, kind: ReactionKind, count: u32) {
        self.0.insert(kind, count);
    }

    /// Add one to a kind
    pub fn increment(&mut self, kind: ReactionKind) {
        let entry = self.0.entry(kind).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    /// Remove one from a kind, never going below zero
    pub fn decrement(&mut self, kind: ReactionKind) {
        let entry = self.0.entry(kind).or_insert(0);
        *entry = entry.saturating_sub(1);
    }

    /// Sum over all kinds
    pub fn total(&self) -> u64 {
        self.0.values().map(|&c| u64::from(c)).sum()
    }

    /// Iterate over the non-zero counts
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u32)> + '_ {
        self.0
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&kind, &count)| (kind, count))
    }
}

impl FromIterator<(ReactionKind, u32)> for ReactionCounts {
    fn from_iter<I: IntoIterator<Item = (ReactionKind, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
