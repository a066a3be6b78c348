//! Remote events pushed by the real-time channel

mod remote_event;

pub use remote_event::{RemoteEvent, RemoteEventType};
