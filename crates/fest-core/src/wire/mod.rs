//! Wire representations shared by the HTTP and real-time adapters
//!
//! The backend sends the same idea and comment shapes over REST and over the
//! push channel, with slightly inconsistent field naming. Payloads accept
//! both spellings and map into the domain entities.

mod mappers;
mod payloads;

pub use mappers::{counts_from_wire, parse_timestamp};
pub use payloads::{CommentPayload, IdeaPayload, VoteUpdatePayload};
