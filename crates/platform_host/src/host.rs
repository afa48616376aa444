//! Host service bundle injected into the file session runtime.

use std::rc::Rc;

use crate::{
    Clock, MemoryNotificationService, MemoryObjectUrlService, MemoryPrefsStore,
    NotificationService, ObjectUrlService, PrefsStore, SystemClock,
};

/// Runtime-selected host services.
///
/// All environment-specific adapter selection happens before this bundle reaches the session
/// runtime, which keeps the core decoupled from browser APIs.
#[derive(Clone)]
pub struct HostServices {
    /// Byte-source locator service (object URLs, reads, downloads).
    pub object_urls: Rc<dyn ObjectUrlService>,
    /// Toast-style notification delivery.
    pub notifications: Rc<dyn NotificationService>,
    /// Lightweight typed preference store.
    pub prefs: Rc<dyn PrefsStore>,
    /// Wall-clock source.
    pub clock: Rc<dyn Clock>,
}

impl HostServices {
    /// Builds a bundle entirely backed by in-memory adapters and the system clock.
    pub fn in_memory() -> Self {
        Self {
            object_urls: Rc::new(MemoryObjectUrlService::default()),
            notifications: Rc::new(MemoryNotificationService::default()),
            prefs: Rc::new(MemoryPrefsStore::default()),
            clock: Rc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
