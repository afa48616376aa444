//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for byte-source locators (object
//! URLs), `localStorage` preferences, and notifications. Native builds select in-memory adapters
//! so the same wiring compiles and runs in tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod notifications;
pub mod object_url;
pub mod storage;

pub use adapters::{
    build_host_services, host_strategy_name, notification_service, object_url_service,
    prefs_store, selected_host_strategy, HostStrategy, NotificationServiceAdapter,
    ObjectUrlServiceAdapter, PrefsStoreAdapter,
};
pub use notifications::WebNotificationService;
pub use object_url::WebObjectUrlService;
pub use storage::local_prefs::WebPrefsStore;
