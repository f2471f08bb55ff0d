//! User-facing notifications.
//!
//! The store reports persistence and sync outcomes through a [`Notifier`]
//! collaborator instead of returning errors from mutations. A GUI polls the
//! buffered variant for toasts; headless callers use [`NullNotifier`].

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Success,
    Error,
}

/// A transient, non-blocking user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Error, message)
    }

    fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Sink for fire-and-forget notifications. Purely informational; correctness
/// never depends on delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Discards every notification.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Buffers notifications for polling.
#[derive(Default)]
pub struct BufferNotifier {
    buffer: Mutex<Vec<Notification>>,
}

impl BufferNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all buffered notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.buffer.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for BufferNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.buffer.lock() {
            guard.push(notification);
        }
    }
}
