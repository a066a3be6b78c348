//! Domain entities - client-side views of server-owned objects

mod comment;
mod idea;
mod reaction;

pub use comment::{normalize_comment, Comment, DEFAULT_COMMENT_MAX_LENGTH};
pub use idea::{Idea, IdeaDraft, SortOrder};
pub use reaction::{ReactionCounts, ReactionKind};
