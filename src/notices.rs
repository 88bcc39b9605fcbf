//! Transient, non-blocking notices
//!
//! Network failures and other soft errors never propagate to the caller.
//! They are logged and surfaced here instead, where they expire on their own
//! after a TTL.

use serde::Serialize;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message with timestamp for TTL-based expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    #[serde(skip)]
    pub created_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    /// Check if the notice has expired based on TTL
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Collects notices from the event thread and from background requests
///
/// Background work posts through a [`NoticeSender`]; the owner drains the
/// channel with [`NoticeBoard::poll`] on its own thread.
#[derive(Debug)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    ttl: Duration,
    sender: Sender<Notice>,
    receiver: Receiver<Notice>,
}

/// Cloneable handle for posting notices from other threads
#[derive(Debug, Clone)]
pub struct NoticeSender(Sender<Notice>);

impl NoticeSender {
    /// Post a notice; silently dropped if the board is gone
    pub fn send(&self, notice: Notice) {
        let _ = self.0.send(notice);
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(3))
    }
}

impl NoticeBoard {
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        let (sender, receiver) = channel();
        Self {
            notices: Vec::new(),
            ttl,
            sender,
            receiver,
        }
    }

    #[must_use]
    pub fn sender(&self) -> NoticeSender {
        NoticeSender(self.sender.clone())
    }

    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice::new(level, text));
    }

    /// Move notices posted by background work onto the board and drop expired ones
    pub fn poll(&mut self) {
        while let Ok(notice) = self.receiver.try_recv() {
            self.notices.push(notice);
        }
        let ttl = self.ttl;
        self.notices.retain(|n| !n.is_expired(ttl));
    }

    /// Get the most recent unexpired notice, if any
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.iter().rev().find(|n| !n.is_expired(self.ttl))
    }

    /// All unexpired notices, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<&Notice> {
        self.notices.iter().filter(|n| !n.is_expired(self.ttl)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_returns_newest() {
        let mut board = NoticeBoard::default();
        board.push(NoticeLevel::Info, "first");
        board.push(NoticeLevel::Error, "second");
        assert_eq!(board.latest().map(|n| n.text.as_str()), Some("second"));
        assert_eq!(board.active().len(), 2);
    }

    #[test]
    fn test_background_notices_arrive_on_poll() {
        let mut board = NoticeBoard::default();
        let sender = board.sender();
        std::thread::spawn(move || sender.send(Notice::new(NoticeLevel::Warning, "export failed")))
            .join()
            .unwrap();

        assert!(board.latest().is_none());
        board.poll();
        assert_eq!(board.latest().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn test_expired_notices_are_dropped() {
        let mut board = NoticeBoard::with_ttl(Duration::ZERO);
        board.push(NoticeLevel::Info, "gone");
        std::thread::sleep(Duration::from_millis(2));
        assert!(board.latest().is_none());
        board.poll();
        assert!(board.active().is_empty());
    }
}
