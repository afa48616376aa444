//! User-visible notification contracts.

mod service;

pub use service::{
    MemoryNotificationService, NoopNotificationService, NotificationFuture, NotificationLevel,
    NotificationRecord, NotificationService,
};
