//! Session reducer: the only mutation path for registry, uploads, preview, and view state.
//!
//! [`FileSession::apply`] is synchronous and infallible. Work that needs the host (toasts,
//! content reads, downloads) comes back as [`SessionEffect`] values for the runtime to execute.

use std::rc::Rc;

use platform_host::{Clock, NotificationLevel, ObjectUrlService};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::FileSessionConfig,
    error::FileSessionError,
    model::{FileEntry, FileId, RawFile, SearchSortState, SortKey, ViewMode},
    preview::{
        PreviewLoad, PreviewOrchestrator, PreviewPayload, PreviewSession, PreviewState,
        PreviewToken,
    },
    registry::FileRegistry,
    upload::{ProgressSource, UploadEvent, UploadSimulator},
};

#[derive(Debug, Clone, PartialEq)]
/// Inputs accepted by [`FileSession::apply`].
pub enum SessionAction {
    /// Ingest files from drag-and-drop or the picker and start their uploads.
    AddFiles(Vec<RawFile>),
    /// Delete one file.
    RemoveFile {
        /// File to delete.
        id: FileId,
    },
    /// Delete several files at once.
    RemoveFiles {
        /// Files to delete.
        ids: Vec<FileId>,
    },
    /// Delete every selected file.
    RemoveSelected,
    /// Flip selection for one file.
    ToggleSelect {
        /// File to flip.
        id: FileId,
    },
    /// Replace the selection with every currently visible file.
    SelectAllVisible,
    /// Empty the selection.
    ClearSelection,
    /// Update the name filter.
    SetSearchTerm(String),
    /// Change the sort key.
    SetSortKey(SortKey),
    /// Switch between grid and list layouts.
    SetViewMode(ViewMode),
    /// Advance every active upload once.
    TickUploads,
    /// Advance one upload (per-file timers).
    TickUpload {
        /// File whose upload advances.
        id: FileId,
    },
    /// Open the preview for a file, replacing any open preview.
    OpenPreview {
        /// File to preview.
        id: FileId,
    },
    /// Close the preview.
    ClosePreview,
    /// A key was pressed while the file manager had focus.
    KeyPressed {
        /// `KeyboardEvent.key` value.
        key: String,
    },
    /// A preview media element finished loading.
    PreviewMediaLoaded {
        /// Session the element belongs to.
        token: PreviewToken,
    },
    /// A preview media element failed.
    PreviewMediaFailed {
        /// Session the element belongs to.
        token: PreviewToken,
        /// Browser-reported reason.
        reason: String,
    },
    /// A content load finished.
    PreviewContentLoaded {
        /// Session that requested the load.
        token: PreviewToken,
        /// Loaded payload or failure.
        outcome: Result<PreviewPayload, FileSessionError>,
    },
    /// Next PDF page.
    NextPage,
    /// Previous PDF page.
    PrevPage,
    /// Save a file through the browser.
    Download {
        /// File to save.
        id: FileId,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side effects requested by the reducer.
pub enum SessionEffect {
    /// Show a toast.
    Notify {
        /// Severity.
        level: NotificationLevel,
        /// Message text.
        message: String,
    },
    /// Perform a preview content load and report back with
    /// [`SessionAction::PreviewContentLoaded`].
    LoadPreview(PreviewLoad),
    /// Trigger a "save as" for a locator.
    Download {
        /// Locator to save.
        url: String,
        /// Suggested filename.
        file_name: String,
    },
}

impl SessionEffect {
    fn notify(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Progress bar entry for one in-flight upload.
pub struct UploadProgress {
    /// File being uploaded.
    pub file_id: FileId,
    /// Its name.
    pub file_name: String,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Everything a view needs to render the file manager.
pub struct SessionSnapshot {
    /// Filtered and sorted files.
    pub visible: Vec<FileEntry>,
    /// Number of files in the registry.
    pub total_files: usize,
    /// Sum of sizes of visible files.
    pub visible_size: u64,
    /// Number of selected files.
    pub selected_count: usize,
    /// Every visible file is selected (and at least one is visible).
    pub all_visible_selected: bool,
    /// In-flight uploads in ingestion order.
    pub uploads: Vec<UploadProgress>,
    /// Open preview, if any.
    pub preview: Option<PreviewSession>,
    /// Coarse preview state.
    pub preview_state: PreviewState,
    /// Search term and sort key.
    pub search: SearchSortState,
    /// Layout.
    pub view_mode: ViewMode,
}

/// Single owner of all file-manager state.
pub struct FileSession {
    registry: FileRegistry,
    uploads: UploadSimulator,
    preview: PreviewOrchestrator,
    search: SearchSortState,
    view_mode: ViewMode,
    object_urls: Rc<dyn ObjectUrlService>,
    clock: Rc<dyn Clock>,
}

impl std::fmt::Debug for FileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSession")
            .field("registry", &self.registry)
            .field("uploads", &self.uploads)
            .field("preview", &self.preview)
            .field("search", &self.search)
            .field("view_mode", &self.view_mode)
            .finish_non_exhaustive()
    }
}

impl FileSession {
    /// Creates an empty session.
    pub fn new(
        config: &FileSessionConfig,
        object_urls: Rc<dyn ObjectUrlService>,
        clock: Rc<dyn Clock>,
        progress: Box<dyn ProgressSource>,
    ) -> Self {
        Self {
            registry: FileRegistry::default(),
            uploads: UploadSimulator::new(progress, config.max_progress_increment),
            preview: PreviewOrchestrator::new(config.text_preview_limit_bytes),
            search: SearchSortState::default(),
            view_mode: ViewMode::default(),
            object_urls,
            clock,
        }
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Read access to the upload simulator.
    pub fn uploads(&self) -> &UploadSimulator {
        &self.uploads
    }

    /// Read access to the preview orchestrator.
    pub fn preview(&self) -> &PreviewOrchestrator {
        &self.preview
    }

    /// Applies one action and returns the effects it requests.
    pub fn apply(&mut self, action: SessionAction) -> Vec<SessionEffect> {
        match action {
            SessionAction::AddFiles(files) => self.add_files(files),
            SessionAction::RemoveFile { id } => {
                let removed = self.remove(&[id]);
                removed
                    .first()
                    .map(|entry| {
                        vec![SessionEffect::notify(
                            NotificationLevel::Success,
                            format!("{} deleted successfully", entry.name),
                        )]
                    })
                    .unwrap_or_default()
            }
            SessionAction::RemoveFiles { ids } => self.remove_many(&ids),
            SessionAction::RemoveSelected => {
                let ids = self.registry.selected_ids();
                self.remove_many(&ids)
            }
            SessionAction::ToggleSelect { id } => {
                self.registry.toggle_select(id);
                Vec::new()
            }
            SessionAction::SelectAllVisible => {
                let ids: Vec<FileId> = self
                    .registry
                    .visible_files(&self.search)
                    .into_iter()
                    .map(|record| record.id())
                    .collect();
                self.registry.clear_selection();
                self.registry.select_all(ids);
                Vec::new()
            }
            SessionAction::ClearSelection => {
                self.registry.clear_selection();
                Vec::new()
            }
            SessionAction::SetSearchTerm(term) => {
                self.search.search_term = term;
                Vec::new()
            }
            SessionAction::SetSortKey(key) => {
                self.search.sort_key = key;
                Vec::new()
            }
            SessionAction::SetViewMode(mode) => {
                self.view_mode = mode;
                Vec::new()
            }
            SessionAction::TickUploads => {
                let events = self.uploads.tick_all();
                self.upload_effects(events)
            }
            SessionAction::TickUpload { id } => {
                let events = self.uploads.tick_task(id).into_iter().collect();
                self.upload_effects(events)
            }
            SessionAction::OpenPreview { id } => {
                let Some(entry) = self.registry.entry(id) else {
                    debug!(%id, "preview requested for unknown file");
                    return Vec::new();
                };
                self.preview
                    .open(entry)
                    .map(SessionEffect::LoadPreview)
                    .into_iter()
                    .collect()
            }
            SessionAction::ClosePreview => {
                self.preview.close();
                Vec::new()
            }
            SessionAction::KeyPressed { key } => {
                self.preview.handle_key(&key);
                Vec::new()
            }
            SessionAction::PreviewMediaLoaded { token } => {
                self.preview.media_loaded(token);
                Vec::new()
            }
            SessionAction::PreviewMediaFailed { token, reason } => {
                self.preview.media_failed(token, reason);
                Vec::new()
            }
            SessionAction::PreviewContentLoaded { token, outcome } => {
                self.preview.complete(token, outcome);
                Vec::new()
            }
            SessionAction::NextPage => {
                self.preview.next_page();
                Vec::new()
            }
            SessionAction::PrevPage => {
                self.preview.prev_page();
                Vec::new()
            }
            SessionAction::Download { id } => match self.registry.get(id) {
                Some(record) => vec![SessionEffect::Download {
                    url: record.content_url().to_string(),
                    file_name: record.name().to_string(),
                }],
                None => {
                    debug!(%id, "download requested for unknown file");
                    Vec::new()
                }
            },
        }
    }

    /// Builds the view read-model.
    pub fn snapshot(&self) -> SessionSnapshot {
        let visible = self.registry.visible_entries(&self.search);
        let visible_size = visible
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.size));
        let all_visible_selected =
            !visible.is_empty() && visible.iter().all(|entry| entry.selected);
        SessionSnapshot {
            total_files: self.registry.len(),
            visible_size,
            selected_count: self.registry.selected_ids().len(),
            all_visible_selected,
            uploads: self
                .uploads
                .active()
                .map(|task| UploadProgress {
                    file_id: task.file_id,
                    file_name: task.file_name.clone(),
                    progress: task.progress,
                })
                .collect(),
            preview: self.preview.session().cloned(),
            preview_state: self.preview.state(),
            search: self.search.clone(),
            view_mode: self.view_mode,
            visible,
        }
    }

    fn add_files(&mut self, files: Vec<RawFile>) -> Vec<SessionEffect> {
        if files.is_empty() {
            return Vec::new();
        }
        let now = self.clock.now_unix_ms();
        let report = self.registry.add(files, &self.object_urls, now);
        for entry in &report.added {
            self.uploads.start(entry.id, entry.name.clone());
        }
        info!(
            added = report.added.len(),
            rejected = report.rejected.len(),
            "files ingested"
        );

        let mut effects = Vec::new();
        if !report.added.is_empty() {
            effects.push(SessionEffect::notify(
                NotificationLevel::Info,
                format!("{} file(s) added to upload queue", report.added.len()),
            ));
        }
        effects.extend(report.rejected.into_iter().map(|rejected| {
            SessionEffect::notify(
                NotificationLevel::Error,
                format!("{}: {}", rejected.name, rejected.reason),
            )
        }));
        effects
    }

    fn remove_many(&mut self, ids: &[FileId]) -> Vec<SessionEffect> {
        let removed = self.remove(ids);
        if removed.is_empty() {
            return Vec::new();
        }
        vec![SessionEffect::notify(
            NotificationLevel::Success,
            format!("{} file(s) deleted", removed.len()),
        )]
    }

    fn remove(&mut self, ids: &[FileId]) -> Vec<FileEntry> {
        let removed = self.registry.remove(ids);
        for entry in &removed {
            self.uploads.cancel(entry.id);
            if self.preview.is_previewing(entry.id) {
                self.preview.close();
            }
        }
        if !removed.is_empty() {
            info!(removed = removed.len(), "files removed");
        }
        removed
    }

    fn upload_effects(&self, events: Vec<UploadEvent>) -> Vec<SessionEffect> {
        events
            .into_iter()
            .filter_map(|event| match event {
                UploadEvent::Completed { file_id, file_name } => {
                    info!(file = %file_id, "upload complete");
                    Some(SessionEffect::notify(
                        NotificationLevel::Success,
                        format!("{file_name} uploaded successfully!"),
                    ))
                }
                UploadEvent::Progressed { .. } => None,
            })
            .collect()
    }
}
