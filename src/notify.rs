use std::time::Duration;

use parking_lot::Mutex;

/// How long a toast stays on screen.
pub const TOAST_LIFE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub life: Duration,
}

impl Notification {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            summary: "Success".into(),
            detail: detail.into(),
            life: TOAST_LIFE,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: "Error".into(),
            detail: detail.into(),
            life: TOAST_LIFE,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Collects notifications until the front end drains them.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: Mutex<Vec<Notification>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue.lock().clone()
    }
}

impl Notifier for Toasts {
    fn show(&self, notification: Notification) {
        match notification.severity {
            Severity::Error | Severity::Warn => {
                tracing::warn!(detail = %notification.detail, "{}", notification.summary)
            }
            Severity::Success | Severity::Info => {
                tracing::info!(detail = %notification.detail, "{}", notification.summary)
            }
        }
        self.queue.lock().push(notification);
    }
}
