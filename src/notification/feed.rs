//! Header feed: the bus consumer that keeps the unread badge up to date
//! and decides which incoming notifications raise a toast.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::bus::{NotificationBus, Subscription};
use crate::models::notification::{Notification, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Same as the notification id, so repeated deliveries collapse.
    pub id: String,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    /// Critical and warning notifications raise a toast; info does not.
    pub fn for_notification(notification: &Notification) -> Option<Self> {
        let (kind, duration) = match notification.severity {
            Severity::Critical => (ToastKind::Error, Duration::from_secs(7)),
            Severity::Warning => (ToastKind::Warning, Duration::from_secs(5)),
            Severity::Info => return None,
        };
        Some(Self {
            id: notification.id.clone(),
            kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            duration,
        })
    }
}

/// Badge text for an unread count: hidden at zero, capped at "9+".
pub fn badge_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=9 => Some(count.to_string()),
        _ => Some("9+".to_string()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderFeed {
    unread: Arc<AtomicUsize>,
}

impl HeaderFeed {
    /// Start from the unread count of the notification center.
    pub fn new(initial_unread: usize) -> Self {
        Self {
            unread: Arc::new(AtomicUsize::new(initial_unread)),
        }
    }

    /// Subscribe to `bus`. Every delivered notification bumps the unread
    /// counter; toast-worthy ones are handed to `on_toast`.
    ///
    /// The caller owns the returned subscription and must unsubscribe it
    /// on teardown.
    pub fn attach<F>(&self, bus: &NotificationBus, on_toast: F) -> Subscription
    where
        F: Fn(Toast) + Send + Sync + 'static,
    {
        let unread = Arc::clone(&self.unread);
        bus.subscribe(move |notification| {
            unread.fetch_add(1, Ordering::SeqCst);
            if let Some(toast) = Toast::for_notification(notification) {
                on_toast(toast);
            }
        })
    }

    pub fn unread(&self) -> usize {
        self.unread.load(Ordering::SeqCst)
    }

    pub fn badge(&self) -> Option<String> {
        badge_label(self.unread())
    }

    pub fn reset(&self) {
        self.unread.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::bus::BusConfig;
    use chrono::Utc;
    use std::sync::Mutex;

    fn notification(id: &str, severity: Severity) -> Notification {
        Notification {
            id: id.into(),
            obra_id: "1".into(),
            obra_name: "Galpão Industrial Norte".into(),
            severity,
            title: severity.title().into(),
            message: "Inspeção de rotina realizada".into(),
            timestamp: Utc::now(),
            read: false,
        }
    }

    #[test]
    fn test_toast_policy() {
        let critical = Toast::for_notification(&notification("c", Severity::Critical)).unwrap();
        assert_eq!(critical.kind, ToastKind::Error);
        assert_eq!(critical.duration, Duration::from_secs(7));
        assert_eq!(critical.id, "c");

        let warning = Toast::for_notification(&notification("w", Severity::Warning)).unwrap();
        assert_eq!(warning.kind, ToastKind::Warning);
        assert_eq!(warning.duration, Duration::from_secs(5));

        assert!(Toast::for_notification(&notification("i", Severity::Info)).is_none());
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(1).as_deref(), Some("1"));
        assert_eq!(badge_label(9).as_deref(), Some("9"));
        assert_eq!(badge_label(10).as_deref(), Some("9+"));
    }

    #[test]
    fn test_feed_counts_and_toasts() {
        let bus = NotificationBus::new(BusConfig::default()).unwrap();
        let feed = HeaderFeed::new(3);
        let toasts = Arc::new(Mutex::new(Vec::new()));

        let t = Arc::clone(&toasts);
        let sub = feed.attach(&bus, move |toast| t.lock().unwrap().push(toast.id));

        bus.emit(&notification("a", Severity::Critical));
        bus.emit(&notification("b", Severity::Info));
        bus.emit(&notification("c", Severity::Warning));

        assert_eq!(feed.unread(), 6);
        assert_eq!(*toasts.lock().unwrap(), vec!["a", "c"]);

        sub.unsubscribe();
        bus.emit(&notification("d", Severity::Critical));
        assert_eq!(feed.unread(), 6);

        feed.reset();
        assert_eq!(feed.badge(), None);
    }
}
