//! Effect executor binding a [`FileSession`] to [`HostServices`].

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use platform_host::{HostServices, NotificationLevel};
use tracing::warn;

use crate::{
    config::FileSessionConfig,
    content::{
        decode_text_preview, DocumentConverter, DocxHtmlConverter, PdfInspector, PdfPageCounter,
    },
    error::FileSessionError,
    preview::{PreviewLoadRequest, PreviewPayload},
    session::{FileSession, SessionAction, SessionEffect, SessionSnapshot},
    upload::{ProgressSource, RandomProgress},
};

/// Callback invoked with a fresh snapshot after every state change.
pub type SnapshotListener = Rc<dyn Fn(SessionSnapshot)>;

/// Owns the session and executes its effects against host services.
///
/// The session is borrowed only for the synchronous [`FileSession::apply`] call, never across an
/// `.await`, so listeners and nested dispatches can always read state.
pub struct SessionRuntime {
    session: RefCell<FileSession>,
    host: HostServices,
    config: FileSessionConfig,
    converter: Box<dyn DocumentConverter>,
    pdf: Box<dyn PdfInspector>,
    listeners: RefCell<Vec<SnapshotListener>>,
}

impl fmt::Debug for SessionRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRuntime")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionRuntime {
    /// Creates a runtime with clock-seeded random upload progress.
    pub fn new(host: HostServices, config: FileSessionConfig) -> Self {
        let seed = host.clock.now_unix_ms();
        Self::with_progress(host, config, Box::new(RandomProgress::from_seed(seed)))
    }

    /// Creates a runtime with an explicit progress source.
    pub fn with_progress(
        host: HostServices,
        config: FileSessionConfig,
        progress: Box<dyn ProgressSource>,
    ) -> Self {
        let config = config.normalized();
        let session = FileSession::new(
            &config,
            Rc::clone(&host.object_urls),
            Rc::clone(&host.clock),
            progress,
        );
        Self {
            session: RefCell::new(session),
            host,
            config,
            converter: Box::new(DocxHtmlConverter),
            pdf: Box::new(PdfPageCounter),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Loads [`FileSessionConfig`] from the host preference store, then builds the runtime.
    pub async fn load(host: HostServices) -> Self {
        let config = FileSessionConfig::load_with(host.prefs.as_ref()).await;
        Self::new(host, config)
    }

    /// Replaces the document converter and PDF inspector.
    pub fn with_loaders(
        mut self,
        converter: Box<dyn DocumentConverter>,
        pdf: Box<dyn PdfInspector>,
    ) -> Self {
        self.converter = converter;
        self.pdf = pdf;
        self
    }

    /// Effective (normalized) configuration.
    pub fn config(&self) -> &FileSessionConfig {
        &self.config
    }

    /// Host services the runtime executes against.
    pub fn host(&self) -> &HostServices {
        &self.host
    }

    /// Registers a listener called after every applied action.
    pub fn subscribe(&self, listener: SnapshotListener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Current view read-model.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.borrow().snapshot()
    }

    /// Applies one action synchronously, notifies listeners, and returns unexecuted effects.
    pub fn apply(&self, action: SessionAction) -> Vec<SessionEffect> {
        let effects = self.session.borrow_mut().apply(action);
        self.publish();
        effects
    }

    /// Applies an action and drives every resulting effect to completion.
    ///
    /// Follow-up actions (preview load results) are queued and applied in order.
    pub async fn dispatch(&self, action: SessionAction) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            for effect in self.apply(action) {
                if let Some(follow_up) = self.run_effect(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    async fn run_effect(&self, effect: SessionEffect) -> Option<SessionAction> {
        match effect {
            SessionEffect::Notify { level, message } => {
                self.notify(level, &message).await;
                None
            }
            SessionEffect::Download { url, file_name } => {
                match self.host.object_urls.download(&url, &file_name) {
                    Ok(()) => {
                        self.notify(
                            NotificationLevel::Success,
                            &format!("{file_name} downloaded successfully"),
                        )
                        .await;
                    }
                    Err(err) => {
                        warn!(file = %file_name, error = %err, "download failed");
                        self.notify(
                            NotificationLevel::Error,
                            &format!("Could not download {file_name}: {err}"),
                        )
                        .await;
                    }
                }
                None
            }
            SessionEffect::LoadPreview(load) => {
                let outcome = self.load_preview(load.request).await;
                Some(SessionAction::PreviewContentLoaded {
                    token: load.token,
                    outcome,
                })
            }
        }
    }

    async fn load_preview(
        &self,
        request: PreviewLoadRequest,
    ) -> Result<PreviewPayload, FileSessionError> {
        match request {
            PreviewLoadRequest::FetchText { url, max_bytes } => {
                // One byte past the limit is enough to tell whether the text was cut.
                let bytes = self
                    .host
                    .object_urls
                    .read_prefix(&url, max_bytes.saturating_add(1))
                    .await
                    .map_err(FileSessionError::ContentFetch)?;
                let (text, truncated) = decode_text_preview(&bytes, max_bytes);
                Ok(PreviewPayload::Text { text, truncated })
            }
            PreviewLoadRequest::ConvertDocument { url } => {
                let bytes = self.read(&url).await?;
                self.converter
                    .to_html(&bytes)
                    .map(PreviewPayload::DocumentHtml)
            }
            PreviewLoadRequest::InspectPdf { url } => {
                let bytes = self.read(&url).await?;
                self.pdf.page_count(&bytes).map(PreviewPayload::PdfPages)
            }
        }
    }

    async fn read(&self, url: &str) -> Result<Vec<u8>, FileSessionError> {
        self.host
            .object_urls
            .read_bytes(url)
            .await
            .map_err(FileSessionError::ContentFetch)
    }

    async fn notify(&self, level: NotificationLevel, message: &str) {
        if let Err(err) = self.host.notifications.notify(level, message).await {
            warn!(error = %err, "notification delivery failed");
        }
    }

    fn publish(&self) {
        let listeners = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(snapshot.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;
    use platform_host::{
        ManualClock, MemoryNotificationService, MemoryObjectUrlService, MemoryPrefsStore,
        NotificationRecord,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        config::SESSION_CONFIG_PREFS_KEY,
        model::{FileId, RawFile},
        preview::{PreviewContent, PreviewPhase},
    };

    struct Harness {
        runtime: SessionRuntime,
        urls: MemoryObjectUrlService,
        notifications: MemoryNotificationService,
    }

    struct Constant;

    impl ProgressSource for Constant {
        fn next_increment(&mut self, max: f64) -> f64 {
            max
        }
    }

    fn harness() -> Harness {
        harness_with(FileSessionConfig::default())
    }

    fn harness_with(config: FileSessionConfig) -> Harness {
        let urls = MemoryObjectUrlService::default();
        let notifications = MemoryNotificationService::default();
        let host = HostServices {
            object_urls: Rc::new(urls.clone()),
            notifications: Rc::new(notifications.clone()),
            prefs: Rc::new(MemoryPrefsStore::default()),
            clock: Rc::new(ManualClock::new(0)),
        };
        Harness {
            runtime: SessionRuntime::with_progress(host, config, Box::new(Constant)),
            urls,
            notifications,
        }
    }

    #[test]
    fn notifications_reach_the_host_in_order() {
        let h = harness();
        block_on(h.runtime.dispatch(SessionAction::AddFiles(vec![RawFile::from_bytes(
            "a.txt",
            "text/plain",
            b"a".to_vec(),
        )])));
        for _ in 0..4 {
            block_on(h.runtime.dispatch(SessionAction::TickUploads));
        }
        assert_eq!(
            h.notifications.delivered(),
            vec![
                NotificationRecord {
                    level: NotificationLevel::Info,
                    message: "1 file(s) added to upload queue".to_string(),
                },
                NotificationRecord {
                    level: NotificationLevel::Success,
                    message: "a.txt uploaded successfully!".to_string(),
                },
            ]
        );
    }

    #[test]
    fn text_preview_is_read_through_the_locator() {
        let h = harness();
        block_on(h.runtime.dispatch(SessionAction::AddFiles(vec![RawFile::from_bytes(
            "main.rs",
            "",
            b"fn main() {}".to_vec(),
        )])));
        block_on(h.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));

        let preview = h.runtime.snapshot().preview.expect("preview");
        assert_eq!(preview.phase, PreviewPhase::Ready);
        assert_eq!(
            preview.content,
            Some(PreviewContent::Text {
                text: "fn main() {}".to_string(),
                language: "rust".to_string(),
                truncated: false,
            })
        );
    }

    #[test]
    fn large_text_preview_reads_only_the_limit() {
        let h = harness_with(FileSessionConfig {
            text_preview_limit_bytes: 1024,
            ..FileSessionConfig::default()
        });
        block_on(h.runtime.dispatch(SessionAction::AddFiles(vec![RawFile::from_bytes(
            "server.log",
            "text/plain",
            vec![b'a'; 8 * 1024 * 1024],
        )])));
        block_on(h.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));

        assert_eq!(h.urls.bytes_read(), 1025);
        let preview = h.runtime.snapshot().preview.expect("preview");
        assert_eq!(preview.phase, PreviewPhase::Ready);
        let Some(PreviewContent::Text {
            text, truncated, ..
        }) = preview.content
        else {
            panic!("expected text content, got {:?}", preview.content);
        };
        assert_eq!(text.len(), 1024);
        assert!(truncated);
    }

    #[test]
    fn unreadable_locator_becomes_preview_error() {
        let h = harness();
        block_on(h.runtime.dispatch(SessionAction::AddFiles(vec![RawFile {
            name: "picked.pdf".to_string(),
            size: 10,
            mime_type: "application/pdf".to_string(),
            source: platform_host::BlobSource::HostUrl("blob:https://app/9".to_string()),
        }])));
        block_on(h.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));

        let phase = h.runtime.snapshot().preview.map(|p| p.phase);
        let Some(PreviewPhase::Error(reason)) = phase else {
            panic!("expected error phase, got {phase:?}");
        };
        assert!(reason.starts_with("could not read file content"), "{reason}");
    }

    #[test]
    fn download_notifies_after_host_accepts() {
        let h = harness();
        block_on(h.runtime.dispatch(SessionAction::AddFiles(vec![RawFile::from_bytes(
            "a.bin",
            "",
            vec![1],
        )])));
        block_on(h.runtime.dispatch(SessionAction::Download { id: FileId(1) }));

        assert_eq!(h.urls.downloads().len(), 1);
        assert_eq!(
            h.notifications.messages(NotificationLevel::Success),
            vec!["a.bin downloaded successfully".to_string()]
        );
    }

    #[test]
    fn listeners_see_every_state_change() {
        let h = harness();
        let calls = Rc::new(Cell::new(0usize));
        let last_total = Rc::new(Cell::new(0usize));
        {
            let calls = Rc::clone(&calls);
            let last_total = Rc::clone(&last_total);
            h.runtime.subscribe(Rc::new(move |snapshot: SessionSnapshot| {
                calls.set(calls.get() + 1);
                last_total.set(snapshot.total_files);
            }));
        }
        h.runtime.apply(SessionAction::AddFiles(vec![RawFile::from_bytes(
            "a", "", vec![1],
        )]));
        h.runtime.apply(SessionAction::SetSearchTerm("a".to_string()));
        assert_eq!(calls.get(), 2);
        assert_eq!(last_total.get(), 1);
    }

    #[test]
    fn load_reads_config_from_prefs() {
        let prefs = MemoryPrefsStore::default();
        prefs.insert_raw(
            SESSION_CONFIG_PREFS_KEY,
            r#"{"upload_tick_interval_ms":1000,"text_preview_limit_bytes":2048}"#,
        );
        let host = HostServices {
            prefs: Rc::new(prefs),
            ..HostServices::in_memory()
        };
        let runtime = block_on(SessionRuntime::load(host));
        assert_eq!(runtime.config().upload_tick_interval_ms, 1000);
        assert_eq!(runtime.config().text_preview_limit_bytes, 2048);
    }
}
