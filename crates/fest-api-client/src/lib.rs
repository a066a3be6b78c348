//! # fest-api-client
//!
//! `reqwest`-backed implementation of the `IdeaApi` port.

pub mod client;
pub mod dto;
pub mod error;

pub use client::HttpApiClient;
