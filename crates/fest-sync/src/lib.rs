//! # fest-sync
//!
//! Optimistic synchronization of idea votes, reactions, and comments with
//! the remote API and the real-time channel.

pub mod context;
pub mod notice;
pub mod pending;
pub mod session;
mod state;
pub mod synchronizer;


pub use context::{SyncContext, SyncContextBuilder};
pub use notice::{Notice, NoticeLevel, NoticeLog, NoticeSink, UiSignal, DEFAULT_NOTICE_CAPACITY};
pub use pending::{PendingGuard, PendingGuards};
pub use session::{AppliedEvent, SyncSession};
pub use synchronizer::{CommentSubmission, CounterSynchronizer, ReactionOutcome, VoteOutcome};
