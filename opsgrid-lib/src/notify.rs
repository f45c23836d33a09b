//! User-facing notices
//!
//! The engine reports recoverable problems (a failed page fetch) through a
//! [`Notifier`]. Hosts decide how to surface them: the terminal client
//! queues them as transient toasts, library users may just log.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Default time a notice stays on screen.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, message)
    }

    fn with_level(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }
}

impl From<&str> for Notice {
    fn from(message: &str) -> Self {
        Notice::info(message)
    }
}

impl From<String> for Notice {
    fn from(message: String) -> Self {
        Notice::info(message)
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => log::info!("{}", notice.message),
            NoticeLevel::Warning => log::warn!("{}", notice.message),
            NoticeLevel::Error => log::error!("{}", notice.message),
        }
    }
}

/// Collects notices for a host to drain and display.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = NoticeQueue::new();
        queue.notify(Notice::error("first"));
        queue.notify("second".into());

        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[0].level, NoticeLevel::Error);
        assert_eq!(drained[1].message, "second");
        assert!(queue.is_empty());
    }
}
