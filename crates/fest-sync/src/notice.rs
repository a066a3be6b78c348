//! User-visible notices and UI signals
//!
//! The synchronizer reports outcomes through a `NoticeSink`; presentation code
//! decides how to render them.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use fest_core::IdeaId;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Transient, dismissable message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}

/// Transient view-state changes triggered at an operation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "idea_id", rename_all = "snake_case")]
pub enum UiSignal {
    /// The reaction picker for this idea should close
    MenuClosed(IdeaId),
}

/// Receives notices and signals from the synchronizer
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);

    fn signal(&self, signal: UiSignal);
}

/// Entries a `NoticeLog` keeps per queue before dropping the oldest
pub const DEFAULT_NOTICE_CAPACITY: usize = 256;

/// In-memory sink that also logs every notice
///
/// Each queue is bounded: once full, the oldest entry is dropped, so a
/// caller that never drains still holds at most `capacity` of each.
#[derive(Debug)]
pub struct NoticeLog {
    capacity: usize,
    notices: Mutex<VecDeque<Notice>>,
    signals: Mutex<VecDeque<UiSignal>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
    }

    /// Keep at most `capacity` notices and signals (minimum one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            notices: Mutex::new(VecDeque::new()),
            signals: Mutex::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take all notices collected so far
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock()).into()
    }

    /// Take all signals collected so far
    pub fn drain_signals(&self) -> Vec<UiSignal> {
        std::mem::take(&mut *self.signals.lock()).into()
    }

    /// Most recent notice, if any
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded<T>(queue: &Mutex<VecDeque<T>>, capacity: usize, item: T) {
    let mut queue = queue.lock();
    if queue.len() == capacity {
        queue.pop_front();
    }
    queue.push_back(item);
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "Notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(message = %notice.message, "Notice");
            }
        }
        push_bounded(&self.notices, self.capacity, notice);
    }

    fn signal(&self, signal: UiSignal) {
        tracing::trace!(?signal, "UI signal");
        push_bounded(&self.signals, self.capacity, signal);
    }
}
