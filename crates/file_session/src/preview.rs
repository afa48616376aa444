//! Single-session preview state machine.
//!
//! Opening a preview mints a fresh [`PreviewToken`]. Every asynchronous completion carries the
//! token it was started for, and completions for anything but the current token are dropped.
//! Closing, cancelling, or replacing a session therefore abandons in-flight loads without
//! awaiting them.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    classifier::{self, PreviewKind},
    error::FileSessionError,
    model::{FileEntry, FileId},
};

/// Key that closes an open preview.
pub const PREVIEW_CANCEL_KEY: &str = "Escape";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identity of one opened preview session.
pub struct PreviewToken(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Load progress of the open session.
pub enum PreviewPhase {
    /// Waiting on a media event or a content load.
    Loading,
    /// Content is renderable.
    Ready,
    /// Loading failed with a user-facing reason.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Coarse orchestrator state.
pub enum PreviewState {
    /// No session.
    Closed,
    /// Session open and loading.
    Loading,
    /// Session open and renderable.
    Ready,
    /// Session open with a failure message.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Page cursor for the PDF viewer. `current_page` stays in `[1, total_pages]`.
pub struct PdfPagination {
    current_page: u32,
    total_pages: u32,
}

impl PdfPagination {
    /// Starts on page 1. A zero page count is treated as a single page.
    pub fn new(total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: total_pages.max(1),
        }
    }

    /// Current page, 1-based.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Navigation controls are only enabled for multi-page documents.
    pub fn can_navigate(&self) -> bool {
        self.total_pages > 1
    }

    /// Moves forward one page. Returns `false` at the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page >= self.total_pages {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Moves back one page. Returns `false` at the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Viewer URL for the current page.
    pub fn page_url(&self, content_url: &str) -> String {
        format!("{content_url}#page={}", self.current_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Loaded, renderable content owned by the session.
pub enum PreviewContent {
    /// Render the locator in an image, video, or audio element.
    Media,
    /// Paged PDF viewer.
    Pdf(PdfPagination),
    /// Converted document markup.
    Document {
        /// HTML body.
        html: String,
    },
    /// Code or plain text.
    Text {
        /// Decoded text.
        text: String,
        /// Highlighting language.
        language: String,
        /// The text was cut at the configured limit.
        truncated: bool,
    },
    /// Name, size, type, and a download action.
    Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The one open preview.
pub struct PreviewSession {
    /// Session identity.
    pub token: PreviewToken,
    /// File being previewed, as it was when the session opened.
    pub file: FileEntry,
    /// Renderer family.
    pub kind: PreviewKind,
    /// Load progress.
    pub phase: PreviewPhase,
    /// Content, once loaded.
    pub content: Option<PreviewContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Content a session waits on, performed by the runtime.
pub enum PreviewLoadRequest {
    /// Read and decode up to `max_bytes` of text.
    FetchText {
        /// File locator.
        url: String,
        /// Decode limit.
        max_bytes: usize,
    },
    /// Read and convert a word-processing document.
    ConvertDocument {
        /// File locator.
        url: String,
    },
    /// Read a PDF and count its pages.
    InspectPdf {
        /// File locator.
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A load request tagged with the session it belongs to.
pub struct PreviewLoad {
    /// Session that asked for the load.
    pub token: PreviewToken,
    /// What to load.
    pub request: PreviewLoadRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Successful result of a [`PreviewLoadRequest`].
pub enum PreviewPayload {
    /// Decoded text.
    Text {
        /// Decoded text.
        text: String,
        /// Cut at the limit.
        truncated: bool,
    },
    /// Converted document markup.
    DocumentHtml(String),
    /// PDF page count.
    PdfPages(u32),
}

#[derive(Debug)]
/// Owns at most one [`PreviewSession`].
pub struct PreviewOrchestrator {
    session: Option<PreviewSession>,
    last_token: u64,
    text_limit_bytes: usize,
}

impl PreviewOrchestrator {
    /// Creates a closed orchestrator that caps text previews at `text_limit_bytes`.
    pub fn new(text_limit_bytes: usize) -> Self {
        Self {
            session: None,
            last_token: 0,
            text_limit_bytes,
        }
    }

    /// Opens a preview for `file`, replacing any open session.
    ///
    /// Returns the content load the runtime must perform, if the kind needs one. Media kinds wait
    /// for [`PreviewOrchestrator::media_loaded`]; unsupported files are ready immediately.
    pub fn open(&mut self, file: FileEntry) -> Option<PreviewLoad> {
        self.close();
        self.last_token += 1;
        let token = PreviewToken(self.last_token);
        let kind = file.kind;
        let url = file.content_url.clone();

        let request = match kind {
            PreviewKind::Image | PreviewKind::Video | PreviewKind::Audio => None,
            PreviewKind::Pdf => Some(PreviewLoadRequest::InspectPdf { url }),
            PreviewKind::Document => Some(PreviewLoadRequest::ConvertDocument { url }),
            PreviewKind::Code | PreviewKind::Text => Some(PreviewLoadRequest::FetchText {
                url,
                max_bytes: self.text_limit_bytes,
            }),
            PreviewKind::Unsupported => None,
        };
        let (phase, content) = if kind == PreviewKind::Unsupported {
            (PreviewPhase::Ready, Some(PreviewContent::Metadata))
        } else {
            (PreviewPhase::Loading, None)
        };

        debug!(file = %file.id, kind = kind.as_str(), token = token.0, "preview opened");
        self.session = Some(PreviewSession {
            token,
            file,
            kind,
            phase,
            content,
        });
        request.map(|request| PreviewLoad { token, request })
    }

    /// Closes the open session, dropping any loaded content. Returns `false` if none was open.
    pub fn close(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Closes the session when `key` is the cancel key.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == PREVIEW_CANCEL_KEY && self.close()
    }

    /// Media element reported success.
    pub fn media_loaded(&mut self, token: PreviewToken) -> bool {
        let Some(session) = self.loading_session(token) else {
            return false;
        };
        if !session.kind.is_media() {
            return false;
        }
        session.phase = PreviewPhase::Ready;
        session.content = Some(PreviewContent::Media);
        true
    }

    /// Media element reported an error.
    pub fn media_failed(&mut self, token: PreviewToken, reason: impl Into<String>) -> bool {
        let Some(session) = self.loading_session(token) else {
            return false;
        };
        if !session.kind.is_media() {
            return false;
        }
        let err = FileSessionError::MediaLoad(reason.into());
        warn!(file = %session.file.id, error = %err, "preview media failed");
        session.phase = PreviewPhase::Error(err.to_string());
        true
    }

    /// Applies the result of a content load. Stale or unexpected completions are ignored.
    pub fn complete(
        &mut self,
        token: PreviewToken,
        outcome: Result<PreviewPayload, FileSessionError>,
    ) -> bool {
        let Some(session) = self.loading_session(token) else {
            debug!(token = token.0, "stale preview completion ignored");
            return false;
        };

        let content = match (session.kind, outcome) {
            (PreviewKind::Code | PreviewKind::Text, Ok(PreviewPayload::Text { text, truncated })) => {
                Ok(PreviewContent::Text {
                    text,
                    language: classifier::language_for(&session.file.name).to_string(),
                    truncated,
                })
            }
            (PreviewKind::Document, Ok(PreviewPayload::DocumentHtml(html))) => {
                Ok(PreviewContent::Document { html })
            }
            (PreviewKind::Pdf, Ok(PreviewPayload::PdfPages(pages))) => {
                Ok(PreviewContent::Pdf(PdfPagination::new(pages)))
            }
            (kind, Ok(_)) => Err(format!(
                "unexpected content for a {} preview",
                kind.as_str()
            )),
            (_, Err(err)) => Err(err.to_string()),
        };

        match content {
            Ok(content) => {
                session.phase = PreviewPhase::Ready;
                session.content = Some(content);
            }
            Err(reason) => {
                warn!(file = %session.file.id, error = %reason, "preview load failed");
                session.phase = PreviewPhase::Error(reason);
            }
        }
        true
    }

    /// Advances the PDF pager.
    pub fn next_page(&mut self) -> bool {
        self.pagination_mut().is_some_and(PdfPagination::next_page)
    }

    /// Moves the PDF pager back.
    pub fn prev_page(&mut self) -> bool {
        self.pagination_mut().is_some_and(PdfPagination::prev_page)
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&PreviewSession> {
        self.session.as_ref()
    }

    /// Returns `true` when the open session previews `id`.
    pub fn is_previewing(&self, id: FileId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.file.id == id)
    }

    /// Coarse state.
    pub fn state(&self) -> PreviewState {
        match self.session.as_ref().map(|session| &session.phase) {
            None => PreviewState::Closed,
            Some(PreviewPhase::Loading) => PreviewState::Loading,
            Some(PreviewPhase::Ready) => PreviewState::Ready,
            Some(PreviewPhase::Error(_)) => PreviewState::Error,
        }
    }

    fn loading_session(&mut self, token: PreviewToken) -> Option<&mut PreviewSession> {
        self.session
            .as_mut()
            .filter(|session| session.token == token && session.phase == PreviewPhase::Loading)
    }

    fn pagination_mut(&mut self) -> Option<&mut PdfPagination> {
        match self.session.as_mut()?.content.as_mut()? {
            PreviewContent::Pdf(pagination) => Some(pagination),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classifier::{color_for, icon_for};

    fn entry(id: u64, name: &str, mime: &str) -> FileEntry {
        FileEntry {
            id: FileId(id),
            name: name.to_string(),
            size: 2048,
            mime_type: mime.to_string(),
            uploaded_at_unix_ms: 0,
            content_url: format!("blob:test/{id}"),
            selected: false,
            kind: classifier::classify(mime, name),
            icon: icon_for(mime),
            color: color_for(mime),
        }
    }

    #[test]
    fn media_preview_waits_for_element_event() {
        let mut preview = PreviewOrchestrator::new(1024);
        assert_eq!(preview.open(entry(1, "photo.jpg", "image/jpeg")), None);
        assert_eq!(preview.state(), PreviewState::Loading);

        let token = preview.session().map(|s| s.token).expect("session");
        assert!(preview.media_loaded(token));
        assert_eq!(preview.state(), PreviewState::Ready);
        assert_eq!(
            preview.session().and_then(|s| s.content.clone()),
            Some(PreviewContent::Media)
        );
    }

    #[test]
    fn media_failure_becomes_error_phase() {
        let mut preview = PreviewOrchestrator::new(1024);
        preview.open(entry(1, "clip.mp4", "video/mp4"));
        let token = preview.session().map(|s| s.token).expect("session");
        assert!(preview.media_failed(token, "decode error"));
        assert_eq!(
            preview.session().map(|s| s.phase.clone()),
            Some(PreviewPhase::Error(
                "media failed to load: decode error".to_string()
            ))
        );
        assert!(!preview.media_loaded(token));
    }

    #[test]
    fn text_preview_requests_limited_fetch_and_tags_language() {
        let mut preview = PreviewOrchestrator::new(4096);
        let load = preview.open(entry(3, "script.py", "")).expect("load");
        assert_eq!(
            load.request,
            PreviewLoadRequest::FetchText {
                url: "blob:test/3".to_string(),
                max_bytes: 4096
            }
        );
        assert!(preview.complete(
            load.token,
            Ok(PreviewPayload::Text {
                text: "print(1)".to_string(),
                truncated: false
            })
        ));
        assert_eq!(
            preview.session().and_then(|s| s.content.clone()),
            Some(PreviewContent::Text {
                text: "print(1)".to_string(),
                language: "python".to_string(),
                truncated: false
            })
        );
    }

    #[test]
    fn reopening_abandons_the_previous_load() {
        let mut preview = PreviewOrchestrator::new(1024);
        let first = preview.open(entry(1, "a.docx", "")).expect("first load");
        let second = preview.open(entry(2, "b.txt", "text/plain")).expect("second");
        assert_ne!(first.token, second.token);

        assert!(!preview.complete(
            first.token,
            Ok(PreviewPayload::DocumentHtml("<p>old</p>".to_string()))
        ));
        let session = preview.session().expect("session");
        assert_eq!(session.file.id, FileId(2));
        assert_eq!(session.phase, PreviewPhase::Loading);
    }

    #[test]
    fn cancel_key_closes_regardless_of_phase() {
        let mut preview = PreviewOrchestrator::new(1024);
        let load = preview.open(entry(1, "a.pdf", "application/pdf")).expect("load");
        assert!(!preview.handle_key("Enter"));
        assert!(preview.handle_key(PREVIEW_CANCEL_KEY));
        assert_eq!(preview.state(), PreviewState::Closed);
        assert!(!preview.complete(load.token, Ok(PreviewPayload::PdfPages(3))));
        assert!(!preview.handle_key(PREVIEW_CANCEL_KEY));
    }

    #[test]
    fn unsupported_files_are_ready_without_loading() {
        let mut preview = PreviewOrchestrator::new(1024);
        assert_eq!(preview.open(entry(1, "bundle.zip", "application/zip")), None);
        assert_eq!(preview.state(), PreviewState::Ready);
        assert_eq!(
            preview.session().and_then(|s| s.content.clone()),
            Some(PreviewContent::Metadata)
        );
    }

    #[test]
    fn pdf_pagination_clamps_and_builds_page_urls() {
        let mut preview = PreviewOrchestrator::new(1024);
        let load = preview.open(entry(5, "deck.pdf", "application/pdf")).expect("load");
        assert!(!preview.next_page());
        preview.complete(load.token, Ok(PreviewPayload::PdfPages(2)));

        assert!(!preview.prev_page());
        assert!(preview.next_page());
        assert!(!preview.next_page());
        let Some(PreviewContent::Pdf(pages)) = preview.session().and_then(|s| s.content.clone())
        else {
            panic!("expected pdf content");
        };
        assert_eq!(pages.current_page(), 2);
        assert!(pages.can_navigate());
        assert_eq!(pages.page_url("blob:test/5"), "blob:test/5#page=2");
        assert!(!PdfPagination::new(1).can_navigate());
        assert_eq!(PdfPagination::new(0).total_pages(), 1);
    }

    #[test]
    fn load_errors_and_mismatched_payloads_become_error_phase() {
        let mut preview = PreviewOrchestrator::new(1024);
        let load = preview.open(entry(1, "a.docx", "")).expect("load");
        preview.complete(
            load.token,
            Err(FileSessionError::DocumentConversion("bad zip".to_string())),
        );
        assert_eq!(
            preview.session().map(|s| s.phase.clone()),
            Some(PreviewPhase::Error(
                "could not convert document: bad zip".to_string()
            ))
        );

        let load = preview.open(entry(2, "b.pdf", "")).expect("load");
        preview.complete(load.token, Ok(PreviewPayload::DocumentHtml(String::new())));
        assert_eq!(preview.state(), PreviewState::Error);
    }
}
