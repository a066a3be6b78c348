//! Kinds of viewer mutation that can be in flight for an idea

use std::fmt;

/// Mutation kind used to key in-flight guards per idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Vote,
    Reaction,
    Comment,
}

impl MutationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vote => "vote",
            Self::Reaction => "reaction",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
