//! Transient notifications (the toast surface).
//!
//! Mutation outcomes post a notice that auto-expires after a short TTL; the
//! rendering shell polls `active` on its own cadence. Time is passed in
//! explicitly so expiry is deterministic under test.

use chrono::{DateTime, Duration, Utc};

/// Kind of notice, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    posted_at: DateTime<Utc>,
}

impl Notice {
    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

/// Holds notices until they expire.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// Default auto-dismiss window, matching the account page's toast.
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(3))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now: DateTime<Utc>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
            posted_at: now,
        });
    }

    /// Notices still within their TTL, oldest first.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|n| now - n.posted_at < self.ttl)
            .collect()
    }

    /// Drop expired notices.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.notices.retain(|n| now - n.posted_at < ttl);
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}
