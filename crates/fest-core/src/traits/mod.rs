//! Ports - interfaces the synchronizer needs from the outside world

mod ports;

pub use ports::{IdeaApi, NoopSubscriber, ReactionResult, TopicSubscriber, VoteResult};
