//! # fest-core
//!
//! Domain layer for the idea board client: idea snapshots, reaction kinds,
//! comments, remote push events, and the ports the synchronizer talks through.
//! This crate has no dependency on any transport (HTTP client, WebSocket, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;
pub mod wire;

// Re-export commonly used types at crate root
pub use entities::{
    normalize_comment, Comment, Idea, IdeaDraft, ReactionCounts, ReactionKind, SortOrder,
    DEFAULT_COMMENT_MAX_LENGTH,
};
pub use error::{DomainError, DomainResult};
pub use events::{RemoteEvent, RemoteEventType};
pub use traits::{IdeaApi, NoopSubscriber, ReactionResult, TopicSubscriber, VoteResult};
pub use value_objects::{Credential, IdeaId, IdeaIdParseError, MutationKind};
