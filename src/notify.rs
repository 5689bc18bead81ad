use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Receives user-facing notifications.
///
/// Implementations decide how to present them: a terminal line, an entry in
/// a rendered notification area, or nothing at all.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A shared reference to a notification sink
pub type SharedNotificationSink = Arc<dyn NotificationSink>;

/// Silently drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _notification: Notification) {}
}

impl NoopSink {
    pub fn shared() -> SharedNotificationSink {
        Arc::new(Self)
    }
}

/// Keeps notifications around for a fixed time so a view can show them.
///
/// Expired entries are pruned whenever the active set is read.
pub struct NotificationCenter {
    entries: Mutex<Vec<(Notification, Instant)>>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ttl,
        }
    }

    /// Notifications younger than the configured lifetime, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    fn active_at(&self, now: Instant) -> Vec<Notification> {
        let Ok(mut entries) = self.entries.lock() else {
            return Vec::new();
        };
        entries.retain(|(_, shown)| now.saturating_duration_since(*shown) < self.ttl);
        entries.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, notification: Notification) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((notification, Instant::now()));
        }
    }
}

/// Collects every notification; used by tests across the crate
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, level: NotificationLevel) -> usize {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
