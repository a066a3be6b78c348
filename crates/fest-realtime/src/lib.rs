//! # fest-realtime
//!
//! WebSocket client for the idea board's push channel. Decoded events are
//! forwarded into a single queue consumed by the synchronizer; connection and
//! reconnection handling stay in this crate.

pub mod client;
pub mod protocol;

pub use client::{RealtimeClient, RealtimeHandle};
pub use protocol::{ChannelMessage, DecodeError};
