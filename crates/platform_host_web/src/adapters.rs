use std::rc::Rc;

use platform_host::{
    BlobSource, HostServices, MemoryObjectUrlService, MemoryPrefsStore, NoopNotificationService,
    NotificationFuture, NotificationLevel, NotificationService, ObjectUrlFuture, ObjectUrlService,
    PrefsStore, PrefsStoreFuture, SystemClock,
};

use crate::{WebNotificationService, WebObjectUrlService, WebPrefsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters (`wasm32`).
    Browser,
    /// In-memory adapters for native builds and tests.
    InMemory,
}

/// Returns the host strategy for the active build target.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(target_arch = "wasm32")]
    {
        HostStrategy::Browser
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostStrategy::InMemory
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::InMemory => "in-memory",
    }
}

/// Adapter enum that erases the concrete locator backend behind [`ObjectUrlService`].
#[derive(Debug, Clone)]
pub enum ObjectUrlServiceAdapter {
    /// Object URLs, `fetch`, and anchor downloads.
    Browser(WebObjectUrlService),
    /// Byte buffers kept in memory.
    InMemory(MemoryObjectUrlService),
}

impl ObjectUrlService for ObjectUrlServiceAdapter {
    fn register(&self, source: BlobSource) -> Result<String, String> {
        match self {
            Self::Browser(service) => service.register(source),
            Self::InMemory(service) => service.register(source),
        }
    }

    fn revoke(&self, url: &str) {
        match self {
            Self::Browser(service) => service.revoke(url),
            Self::InMemory(service) => service.revoke(url),
        }
    }

    fn read_bytes<'a>(&'a self, url: &'a str) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        match self {
            Self::Browser(service) => service.read_bytes(url),
            Self::InMemory(service) => service.read_bytes(url),
        }
    }

    fn read_prefix<'a>(
        &'a self,
        url: &'a str,
        max_bytes: usize,
    ) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        match self {
            Self::Browser(service) => service.read_prefix(url, max_bytes),
            Self::InMemory(service) => service.read_prefix(url, max_bytes),
        }
    }

    fn download(&self, url: &str, file_name: &str) -> Result<(), String> {
        match self {
            Self::Browser(service) => service.download(url, file_name),
            Self::InMemory(service) => service.download(url, file_name),
        }
    }
}

/// Adapter enum that erases the concrete preference backend behind [`PrefsStore`].
#[derive(Debug, Clone)]
pub enum PrefsStoreAdapter {
    /// `localStorage`.
    Browser(WebPrefsStore),
    /// Process-local map.
    InMemory(MemoryPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::InMemory(store) => store.load_pref(key),
        }
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::InMemory(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::InMemory(store) => store.delete_pref(key),
        }
    }
}

/// Adapter enum that erases the concrete notification backend behind [`NotificationService`].
#[derive(Debug, Clone, Copy)]
pub enum NotificationServiceAdapter {
    /// Console plus Web Notifications.
    Browser(WebNotificationService),
    /// Discards messages.
    InMemory(NoopNotificationService),
}

impl NotificationService for NotificationServiceAdapter {
    fn notify<'a>(
        &'a self,
        level: NotificationLevel,
        message: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(service) => service.notify(level, message),
            Self::InMemory(service) => service.notify(level, message),
        }
    }
}

/// Builds the locator adapter for the active target.
pub fn object_url_service() -> ObjectUrlServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => ObjectUrlServiceAdapter::Browser(WebObjectUrlService),
        HostStrategy::InMemory => {
            ObjectUrlServiceAdapter::InMemory(MemoryObjectUrlService::default())
        }
    }
}

/// Builds the preference adapter for the active target.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::InMemory => PrefsStoreAdapter::InMemory(MemoryPrefsStore::default()),
    }
}

/// Builds the notification adapter for the active target.
pub fn notification_service() -> NotificationServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => NotificationServiceAdapter::Browser(WebNotificationService),
        HostStrategy::InMemory => NotificationServiceAdapter::InMemory(NoopNotificationService),
    }
}

/// Assembles the full [`HostServices`] bundle for the active target.
pub fn build_host_services() -> HostServices {
    HostServices {
        object_urls: Rc::new(object_url_service()),
        notifications: Rc::new(notification_service()),
        prefs: Rc::new(prefs_store()),
        clock: Rc::new(SystemClock),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_builds_select_in_memory_adapters() {
        assert_eq!(selected_host_strategy(), HostStrategy::InMemory);
        assert_eq!(host_strategy_name(), "in-memory");
    }

    #[test]
    fn native_bundle_round_trips_bytes_and_prefs() {
        let host = build_host_services();
        let url = host
            .object_urls
            .register(BlobSource::from_bytes(b"hello".to_vec()))
            .expect("register");
        assert_eq!(
            block_on(host.object_urls.read_bytes(&url)).expect("read"),
            b"hello"
        );
        assert_eq!(
            block_on(host.object_urls.read_prefix(&url, 4)).expect("prefix"),
            b"hell"
        );
        host.object_urls.revoke(&url);
        assert!(block_on(host.object_urls.read_bytes(&url)).is_err());

        block_on(host.prefs.save_pref("k", "1")).expect("save");
        assert_eq!(
            block_on(host.prefs.load_pref("k")).expect("load"),
            Some("1".to_string())
        );
        block_on(host.notifications.notify(NotificationLevel::Info, "hi")).expect("notify");
    }
}
