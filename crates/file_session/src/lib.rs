//! Headless DropVault file session: classification, simulated uploads, the file registry, and
//! preview orchestration behind a single-writer reducer.
//!
//! [`FileSession`] owns all mutable state and is only changed through
//! [`FileSession::apply`]. [`SessionRuntime`] executes the emitted [`SessionEffect`] values
//! against injected [`platform_host::HostServices`] and feeds load results back in.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod classifier;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod model;
pub mod preview;
pub mod registry;
pub mod runtime;
pub mod session;
pub mod theme;
pub mod upload;

pub use classifier::{classify, color_for, icon_for, language_for, FileColor, FileIcon, PreviewKind};
pub use config::{FileSessionConfig, SESSION_CONFIG_PREFS_KEY};
pub use content::{
    decode_text_preview, DocumentConverter, DocxHtmlConverter, PdfInspector, PdfPageCounter,
};
pub use error::FileSessionError;
pub use format::{format_file_size, format_upload_date};
pub use model::{FileEntry, FileId, FileRecord, RawFile, SearchSortState, SortKey, ViewMode};
pub use preview::{
    PdfPagination, PreviewContent, PreviewLoad, PreviewLoadRequest, PreviewOrchestrator,
    PreviewPayload, PreviewPhase, PreviewSession, PreviewState, PreviewToken, PREVIEW_CANCEL_KEY,
};
pub use registry::{FileRegistry, IngestReport, RejectedFile};
pub use runtime::{SessionRuntime, SnapshotListener};
pub use session::{FileSession, SessionAction, SessionEffect, SessionSnapshot, UploadProgress};
pub use theme::{load_theme_preference, save_theme_preference, ThemePreference, THEME_PREFS_KEY};
pub use upload::{
    ProgressSource, RandomProgress, UploadEvent, UploadSimulator, UploadState, UploadTask,
    UPLOAD_COMPLETE,
};
