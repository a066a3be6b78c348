//! Value objects - immutable types identified by their value

mod credential;
mod idea_id;
mod mutation_kind;

pub use credential::Credential;
pub use idea_id::{IdeaId, IdeaIdParseError};
pub use mutation_kind::MutationKind;
