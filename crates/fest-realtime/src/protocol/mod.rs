//! Channel protocol definitions
//!
//! Every frame is a JSON text message `{"event": "<name>", "data": <payload>}`.

mod messages;

pub use messages::{ChannelMessage, DecodeError, JOIN_IDEA, LEAVE_IDEA};
