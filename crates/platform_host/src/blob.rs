//! Byte-source locator (object URL) contracts and adapters.
//!
//! A locator is minted once per ingested file and must be revoked exactly once when the owning
//! record is destroyed. Reads and downloads go through the same service so the browser adapter can
//! stay on `URL.createObjectURL` semantics while headless callers use [`MemoryObjectUrlService`].

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`ObjectUrlService`] async methods.
pub type ObjectUrlFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// URL prefix used by [`MemoryObjectUrlService`] for minted locators.
pub const MEMORY_BLOB_URL_PREFIX: &str = "blob:dropvault-memory/";

#[derive(Debug, Clone, PartialEq)]
/// Byte source handed to [`ObjectUrlService::register`].
pub enum BlobSource {
    /// Raw bytes held in memory.
    Bytes(Rc<[u8]>),
    /// A locator the host already minted (for example from a picked browser `File`).
    ///
    /// Registering it transfers ownership: the caller becomes responsible for revoking it.
    HostUrl(String),
}

impl BlobSource {
    /// Wraps an owned byte buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(Rc::from(bytes.into()))
    }
}

/// Host service minting, dereferencing, and releasing byte-source locators.
pub trait ObjectUrlService {
    /// Produces a dereferenceable locator for `source`.
    fn register(&self, source: BlobSource) -> Result<String, String>;

    /// Releases a locator previously returned by [`ObjectUrlService::register`].
    fn revoke(&self, url: &str);

    /// Reads the full byte content behind a live locator.
    fn read_bytes<'a>(&'a self, url: &'a str) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>>;

    /// Reads at most `max_bytes` from the start of a live locator without loading the rest.
    fn read_prefix<'a>(
        &'a self,
        url: &'a str,
        max_bytes: usize,
    ) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>>;

    /// Starts a "save as" download of the locator content under `file_name`.
    fn download(&self, url: &str, file_name: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op locator service for unsupported targets.
pub struct NoopObjectUrlService;

impl ObjectUrlService for NoopObjectUrlService {
    fn register(&self, _source: BlobSource) -> Result<String, String> {
        Err("object urls unavailable: register".to_string())
    }

    fn revoke(&self, _url: &str) {}

    fn read_bytes<'a>(&'a self, _url: &'a str) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async { Err("object urls unavailable: read_bytes".to_string()) })
    }

    fn read_prefix<'a>(
        &'a self,
        _url: &'a str,
        _max_bytes: usize,
    ) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async { Err("object urls unavailable: read_prefix".to_string()) })
    }

    fn download(&self, _url: &str, _file_name: &str) -> Result<(), String> {
        Err("object urls unavailable: download".to_string())
    }
}

#[derive(Debug, Default)]
struct MemoryBlobState {
    next_id: u64,
    live: HashMap<String, Option<Rc<[u8]>>>,
    revocations: HashMap<String, usize>,
    downloads: Vec<(String, String)>,
    bytes_read: usize,
}

#[derive(Debug, Clone, Default)]
/// In-memory locator service that tracks live locators, revocations, and downloads.
///
/// Adopted [`BlobSource::HostUrl`] locators are tracked as live but have no readable bytes.
pub struct MemoryObjectUrlService {
    inner: Rc<RefCell<MemoryBlobState>>,
}

impl MemoryObjectUrlService {
    /// Returns how many times `url` has been revoked.
    pub fn revocation_count(&self, url: &str) -> usize {
        self.inner
            .borrow()
            .revocations
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    /// Returns `true` while `url` is registered and not yet revoked.
    pub fn is_live(&self, url: &str) -> bool {
        self.inner.borrow().live.contains_key(url)
    }

    /// Returns the number of live locators.
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Returns recorded `(url, file_name)` download requests in call order.
    pub fn downloads(&self) -> Vec<(String, String)> {
        self.inner.borrow().downloads.clone()
    }

    /// Returns the total bytes handed out by reads so far.
    pub fn bytes_read(&self) -> usize {
        self.inner.borrow().bytes_read
    }

    fn read_up_to(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, String> {
        let mut state = self.inner.borrow_mut();
        let bytes = match state.live.get(url) {
            Some(Some(bytes)) => bytes[..bytes.len().min(max_bytes)].to_vec(),
            Some(None) => return Err(format!("no readable bytes behind {url}")),
            None => return Err(format!("blob not found: {url}")),
        };
        state.bytes_read = state.bytes_read.saturating_add(bytes.len());
        Ok(bytes)
    }
}

impl ObjectUrlService for MemoryObjectUrlService {
    fn register(&self, source: BlobSource) -> Result<String, String> {
        let mut state = self.inner.borrow_mut();
        match source {
            BlobSource::Bytes(bytes) => {
                state.next_id = state.next_id.saturating_add(1);
                let url = format!("{MEMORY_BLOB_URL_PREFIX}{}", state.next_id);
                state.live.insert(url.clone(), Some(bytes));
                Ok(url)
            }
            BlobSource::HostUrl(url) => {
                if url.trim().is_empty() {
                    return Err("host url is empty".to_string());
                }
                if state.live.contains_key(&url) {
                    return Err(format!("host url already registered: {url}"));
                }
                state.live.insert(url.clone(), None);
                Ok(url)
            }
        }
    }

    fn revoke(&self, url: &str) {
        let mut state = self.inner.borrow_mut();
        state.live.remove(url);
        *state.revocations.entry(url.to_string()).or_insert(0) += 1;
    }

    fn read_bytes<'a>(&'a self, url: &'a str) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move { self.read_up_to(url, usize::MAX) })
    }

    fn read_prefix<'a>(
        &'a self,
        url: &'a str,
        max_bytes: usize,
    ) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move { self.read_up_to(url, max_bytes) })
    }

    fn download(&self, url: &str, file_name: &str) -> Result<(), String> {
        let mut state = self.inner.borrow_mut();
        if !state.live.contains_key(url) {
            return Err(format!("blob not found: {url}"));
        }
        state
            .downloads
            .push((url.to_string(), file_name.to_string()));
        Ok(())
    }
}
