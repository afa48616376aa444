//! Preference storage contract and adapters.
//!
//! A preference is one small JSON document stored as text under a versioned key such as
//! `dropvault.theme.v1`. Stores only move text; typing happens in [`load_pref_with`] and
//! [`save_pref_with`].

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service holding raw JSON text per preference key.
pub trait PrefsStore {
    /// Returns the text stored under `key`, or `None` when the key was never written.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the text stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Removes `key`; removing a missing key succeeds.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that never finds anything and accepts every write.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store; clones share entries.
///
/// [`MemoryPrefsStore::unavailable`] builds a store whose every call fails, standing in for a
/// browser that blocks `localStorage`.
pub struct MemoryPrefsStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    outage: Option<Rc<str>>,
}

impl MemoryPrefsStore {
    /// Store whose every operation fails with `reason`.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            entries: Rc::default(),
            outage: Some(Rc::from(reason)),
        }
    }

    /// Seeds raw text without going through the async API.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), raw_json.into());
    }

    /// Returns the raw text stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn available(&self) -> Result<(), String> {
        match &self.outage {
            Some(reason) => Err(reason.to_string()),
            None => Ok(()),
        }
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { self.available().map(|()| self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.available()?;
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.available()?;
            self.entries.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads `key` and decodes it as `T`.
///
/// # Errors
///
/// Returns the store error, or a decode error naming `key`.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("pref `{key}`: {e}"))
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns an encode error naming `key`, or the store error.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| format!("pref `{key}`: {e}"))?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tuning {
        tick_ms: u64,
    }

    #[test]
    fn clones_share_entries_and_delete_is_idempotent() {
        let store = MemoryPrefsStore::default();
        let shared = store.clone();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("dropvault.theme.v1", "{\"dark_mode\":true}")).expect("save");
        assert_eq!(
            shared.raw("dropvault.theme.v1"),
            Some("{\"dark_mode\":true}".to_string())
        );
        block_on(store_obj.delete_pref("dropvault.theme.v1")).expect("delete");
        block_on(store_obj.delete_pref("dropvault.theme.v1")).expect("delete again");
        assert_eq!(
            block_on(store_obj.load_pref("dropvault.theme.v1")).expect("load"),
            None
        );
    }

    #[test]
    fn typed_helpers_encode_and_decode() {
        let store = MemoryPrefsStore::default();
        block_on(save_pref_with(&store, "tuning", &Tuning { tick_ms: 50 })).expect("save");
        assert_eq!(store.raw("tuning"), Some("{\"tick_ms\":50}".to_string()));

        let loaded: Option<Tuning> = block_on(load_pref_with(&store, "tuning")).expect("load");
        assert_eq!(loaded, Some(Tuning { tick_ms: 50 }));
    }

    #[test]
    fn malformed_text_reports_the_key() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("tuning", "not json");
        let err = block_on(load_pref_with::<_, Tuning>(&store, "tuning")).expect_err("malformed");
        assert!(err.contains("pref `tuning`"), "{err}");
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = MemoryPrefsStore::unavailable("localStorage blocked");
        assert_eq!(
            block_on(store.load_pref("k")),
            Err("localStorage blocked".to_string())
        );
        assert!(block_on(store.save_pref("k", "1")).is_err());
        assert!(block_on(store.delete_pref("k")).is_err());
        assert_eq!(store.raw("k"), None);
    }

    #[test]
    fn noop_store_is_empty_and_accepts_writes() {
        let store: &dyn PrefsStore = &NoopPrefsStore;
        assert_eq!(block_on(store.load_pref("k")).expect("load"), None);
        block_on(store.save_pref("k", "{}")).expect("save");
        block_on(store.delete_pref("k")).expect("delete");
    }
}
