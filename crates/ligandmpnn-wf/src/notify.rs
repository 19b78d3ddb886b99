//! Human-visible notifications raised when a run fails.
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub body: String,
    /// The parameter set that triggered the notification, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Writes each notification as a single JSON line on stderr.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: &Notification) {
        let line = serde_json::to_string(notification)
            .unwrap_or_else(|_| format!("{}: {}", notification.title, notification.body));
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
    }
}

/// Keeps notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
    }
}
