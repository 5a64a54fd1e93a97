//! User-facing transient notifications.
//!
//! The sink trait is the boundary to whatever renders toasts; the session
//! layer only produces title + description + severity.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

pub trait NotificationSink: Send {
    fn notify(&self, notification: Notification);
}

/// Default sink: routes notifications into the tracing pipeline.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Error => tracing::error!(title = %n.title, "{}", n.description),
            Severity::Warning => tracing::warn!(title = %n.title, "{}", n.description),
            Severity::Success | Severity::Info => {
                tracing::info!(title = %n.title, "{}", n.description)
            }
        }
    }
}

/// Test sink: records everything, cloneable so tests keep a handle after
/// handing it to the controller.
#[derive(Clone, Default)]
pub struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock())
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
