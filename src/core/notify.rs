//! Notification sinks
//!
//! The upload workflow reports user-facing outcomes ("Successfully uploaded 2
//! products!") through a [`Notifier`]. How they are shown is up to the caller.

use std::sync::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation failed or input was rejected
    Error,
}

/// Side-effect sink for human-readable notifications
pub trait Notifier: Send + Sync {
    /// Report a success
    fn success(&self, message: &str);

    /// Report a failure
    fn error(&self, message: &str);
}

/// Routes notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notification = %message, "Notification");
    }

    fn error(&self, message: &str) {
        tracing::warn!(notification = %message, "Notification");
    }
}

/// Prints notifications to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✅ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}

/// Keeps notifications in memory, in arrival order
///
/// Useful for front ends that poll for messages, and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: NotificationKind, message: &str) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push((kind, message.to_string()));
    }

    /// Everything recorded so far
    pub fn entries(&self) -> Vec<(NotificationKind, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Recorded error messages
    pub fn errors(&self) -> Vec<String> {
        self.messages_of(NotificationKind::Error)
    }

    /// Recorded success messages
    pub fn successes(&self) -> Vec<String> {
        self.messages_of(NotificationKind::Success)
    }

    fn messages_of(&self, kind: NotificationKind) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m)
            .collect()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.error("first");
        notifier.success("second");
        notifier.error("third");

        assert_eq!(
            notifier.entries(),
            vec![
                (NotificationKind::Error, "first".to_string()),
                (NotificationKind::Success, "second".to_string()),
                (NotificationKind::Error, "third".to_string()),
            ]
        );
        assert_eq!(notifier.errors(), vec!["first", "third"]);
        assert_eq!(notifier.successes(), vec!["second"]);

        notifier.clear();
        assert!(notifier.entries().is_empty());
    }
}
