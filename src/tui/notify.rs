//! Transient notification surface shared across views.
//!
//! The `Notifier` is constructed once at the composition root and handed
//! into the app, so the views never reach for a global. Notifications are
//! time-limited and independent of the per-list error banners.

use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NotifyKind {
    Success,
    Error,
}

/// A single transient message with its expiry deadline.
pub struct Notification {
    pub kind: NotifyKind,
    pub text: String,
    deadline: Instant,
}

/// Process-wide notification capability with `success`/`error`.
pub struct Notifier {
    current: Option<Notification>,
    ttl: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Notifier { current: None, ttl }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NotifyKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotifyKind::Error, text.into());
    }

    fn push(&mut self, kind: NotifyKind, text: String) {
        self.current = Some(Notification {
            kind,
            text,
            deadline: Instant::now() + self.ttl,
        });
    }

    /// Drop the current notification once its deadline has passed.
    pub fn tick(&mut self) {
        if let Some(n) = &self.current {
            if Instant::now() >= n.deadline {
                self.current = None;
            }
        }
    }

    /// Dismiss the current notification immediately.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_notification_replaces_older() {
        let mut n = Notifier::new();
        n.success("created");
        n.error("boom");
        let cur = n.current().unwrap();
        assert_eq!(cur.kind, NotifyKind::Error);
        assert_eq!(cur.text, "boom");
    }

    #[test]
    fn expired_notification_is_dropped_on_tick() {
        let mut n = Notifier::with_ttl(Duration::ZERO);
        n.success("done");
        n.tick();
        assert!(n.current().is_none());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut n = Notifier::new();
        n.error("boom");
        n.dismiss();
        assert!(n.current().is_none());
    }
}
