//! Request and response bodies of the REST API

mod requests;
mod responses;

pub use requests::{CreateCommentRequest, CreateIdeaRequest, ReactRequest, VoteRequest};
pub use responses::{DataResponse, ErrorBody, ListResponse, ReactionResponse, VoteResponse, VoteStats};
