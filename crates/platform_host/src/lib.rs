//! Typed host-domain contracts shared by the DropVault session core and its browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the byte-source
//! locator (object URL) contract, notifications, lightweight preference storage, and clock
//! helpers, together with in-memory and no-op adapters. Concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod blob;
pub mod host;
pub mod notifications;
pub mod storage;
pub mod time;

pub use blob::{
    BlobSource, MemoryObjectUrlService, NoopObjectUrlService, ObjectUrlFuture, ObjectUrlService,
    MEMORY_BLOB_URL_PREFIX,
};
pub use host::HostServices;
pub use notifications::{
    MemoryNotificationService, NoopNotificationService, NotificationFuture, NotificationLevel,
    NotificationRecord, NotificationService,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
