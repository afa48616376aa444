//! Notification service contracts and adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Severity of a toast-style notification.
pub enum NotificationLevel {
    /// Neutral progress information.
    Info,
    /// A completed user action.
    Success,
    /// Something degraded but recoverable.
    Warning,
    /// A failed user action.
    Error,
}

impl NotificationLevel {
    /// Returns a stable token for diagnostics and CSS hooks.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Host service for user-visible notifications.
pub trait NotificationService {
    /// Dispatches a notification message.
    fn notify<'a>(
        &'a self,
        level: NotificationLevel,
        message: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op notification service for unsupported targets.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn notify<'a>(
        &'a self,
        _level: NotificationLevel,
        _message: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One notification captured by [`MemoryNotificationService`].
pub struct NotificationRecord {
    /// Severity.
    pub level: NotificationLevel,
    /// Rendered message.
    pub message: String,
}

#[derive(Debug, Clone, Default)]
/// Notification service that records every message in memory.
pub struct MemoryNotificationService {
    inner: Rc<RefCell<Vec<NotificationRecord>>>,
}

impl MemoryNotificationService {
    /// Returns all notifications delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<NotificationRecord> {
        self.inner.borrow().clone()
    }

    /// Returns delivered messages with the given level.
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.inner
            .borrow()
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }
}

impl NotificationService for MemoryNotificationService {
    fn notify<'a>(
        &'a self,
        level: NotificationLevel,
        message: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().push(NotificationRecord {
                level,
                message: message.to_string(),
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_notifications_keep_order_and_level() {
        let service = MemoryNotificationService::default();
        let service_obj: &dyn NotificationService = &service;

        block_on(service_obj.notify(NotificationLevel::Info, "2 file(s) added")).expect("info");
        block_on(service_obj.notify(NotificationLevel::Success, "a.txt deleted")).expect("ok");

        assert_eq!(
            service.delivered(),
            vec![
                NotificationRecord {
                    level: NotificationLevel::Info,
                    message: "2 file(s) added".to_string(),
                },
                NotificationRecord {
                    level: NotificationLevel::Success,
                    message: "a.txt deleted".to_string(),
                },
            ]
        );
        assert_eq!(
            service.messages(NotificationLevel::Success),
            vec!["a.txt deleted".to_string()]
        );
    }

    #[test]
    fn level_tokens_match_serde_values() {
        assert_eq!(
            serde_json::to_string(&NotificationLevel::Warning).expect("serialize"),
            format!("\"{}\"", NotificationLevel::Warning.as_str())
        );
    }
}
