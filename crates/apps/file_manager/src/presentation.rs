//! Pure display helpers shared by the file manager views.

use file_session::{
    format_file_size, FileEntry, PreviewKind, PreviewPhase, PreviewSession, SearchSortState,
    SessionSnapshot, UPLOAD_COMPLETE,
};

/// Clamped progress value rounded to a whole percent.
fn whole_percent(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, UPLOAD_COMPLETE).round()
}

/// CSS width for a progress bar fill (`"42%"`).
pub fn progress_width(progress: f64) -> String {
    format!("{}%", whole_percent(progress))
}

/// Label shown next to a progress bar.
pub fn progress_label(progress: f64) -> String {
    format!("{}% uploaded", whole_percent(progress))
}

/// `"1 file"` / `"3 files"`.
pub fn file_count_label(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{count} files")
    }
}

/// Header line summarizing the visible library.
pub fn library_summary(snapshot: &SessionSnapshot) -> String {
    let visible = snapshot.visible.len();
    let count = if visible == snapshot.total_files {
        file_count_label(visible)
    } else {
        format!("{visible} of {}", file_count_label(snapshot.total_files))
    };
    format!("{count} · {}", format_file_size(snapshot.visible_size))
}

/// Bulk delete button text; `None` hides the button.
pub fn bulk_delete_label(selected: usize) -> Option<String> {
    (selected > 0).then(|| format!("Delete {selected} selected"))
}

/// Class list for a grid card or list row.
pub fn item_class(base: &str, entry: &FileEntry) -> String {
    if entry.selected {
        format!("{base} selected")
    } else {
        base.to_string()
    }
}

/// Short badge text for a preview kind.
pub fn kind_badge(kind: PreviewKind) -> &'static str {
    match kind {
        PreviewKind::Image => "Image",
        PreviewKind::Video => "Video",
        PreviewKind::Audio => "Audio",
        PreviewKind::Pdf => "PDF",
        PreviewKind::Document => "Document",
        PreviewKind::Code => "Code",
        PreviewKind::Text => "Text",
        PreviewKind::Unsupported => "File",
    }
}

/// Reason reported when a media element fires `error`.
pub fn media_error_reason(kind: PreviewKind) -> String {
    format!("the browser could not play this {}", kind.as_str())
}

/// Message for an empty browser pane.
pub fn empty_state_message(search: &SearchSortState, total_files: usize) -> String {
    if total_files == 0 {
        "No files yet. Drop files above or click to browse.".to_string()
    } else {
        format!("No files match \"{}\".", search.search_term.trim())
    }
}

/// Status line for a preview that is not ready yet.
pub fn preview_status(session: &PreviewSession) -> Option<String> {
    match &session.phase {
        PreviewPhase::Loading => Some(format!("Loading {}...", session.file.name)),
        PreviewPhase::Ready => None,
        PreviewPhase::Error(reason) => Some(format!("Preview failed: {reason}")),
    }
}

/// `"Page 2 of 5"`.
pub fn page_label(current: u32, total: u32) -> String {
    format!("Page {current} of {total}")
}

#[cfg(test)]
mod tests {
    use file_session::{
        FileColor, FileIcon, FileId, PreviewState, PreviewToken, SortKey, ViewMode,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(name: &str, size: u64, selected: bool) -> FileEntry {
        FileEntry {
            id: FileId(1),
            name: name.to_string(),
            size,
            mime_type: "text/plain".to_string(),
            uploaded_at_unix_ms: 0,
            content_url: "memory-blob:1".to_string(),
            selected,
            kind: PreviewKind::Text,
            icon: FileIcon::File,
            color: FileColor::Surface,
        }
    }

    fn snapshot(visible: Vec<FileEntry>, total_files: usize) -> SessionSnapshot {
        SessionSnapshot {
            visible_size: visible.iter().map(|e| e.size).sum(),
            selected_count: visible.iter().filter(|e| e.selected).count(),
            all_visible_selected: false,
            visible,
            total_files,
            uploads: Vec::new(),
            preview: None,
            preview_state: PreviewState::Closed,
            search: SearchSortState {
                search_term: String::new(),
                sort_key: SortKey::Name,
            },
            view_mode: ViewMode::Grid,
        }
    }

    #[test]
    fn progress_is_clamped_and_rounded() {
        assert_eq!(progress_width(41.6), "42%");
        assert_eq!(progress_width(130.0), "100%");
        assert_eq!(progress_width(f64::NAN), "0%");
        assert_eq!(progress_label(-3.0), "0% uploaded");
    }

    #[test]
    fn summary_counts_filtered_results() {
        let all = snapshot(vec![entry("a", 1024, false), entry("b", 512, false)], 2);
        assert_eq!(library_summary(&all), "2 files · 1.5 KB");

        let filtered = snapshot(vec![entry("a", 1024, false)], 3);
        assert_eq!(library_summary(&filtered), "1 of 3 files · 1 KB");
    }

    #[test]
    fn selection_drives_labels_and_classes() {
        assert_eq!(bulk_delete_label(0), None);
        assert_eq!(bulk_delete_label(2), Some("Delete 2 selected".to_string()));
        assert_eq!(item_class("file-card", &entry("a", 1, true)), "file-card selected");
        assert_eq!(item_class("file-row", &entry("a", 1, false)), "file-row");
    }

    #[test]
    fn empty_state_distinguishes_no_files_from_no_matches() {
        let mut search = SearchSortState::default();
        assert!(empty_state_message(&search, 0).starts_with("No files yet"));
        search.search_term = " report ".to_string();
        assert_eq!(empty_state_message(&search, 4), "No files match \"report\".");
    }

    #[test]
    fn preview_status_follows_phase() {
        let mut session = PreviewSession {
            token: PreviewToken(1),
            file: entry("notes.txt", 3, false),
            kind: PreviewKind::Text,
            phase: PreviewPhase::Loading,
            content: None,
        };
        assert_eq!(
            preview_status(&session),
            Some("Loading notes.txt...".to_string())
        );
        session.phase = PreviewPhase::Error("could not read file content: gone".to_string());
        assert_eq!(
            preview_status(&session),
            Some("Preview failed: could not read file content: gone".to_string())
        );
        session.phase = PreviewPhase::Ready;
        assert_eq!(preview_status(&session), None);
    }

    #[test]
    fn badges_and_media_reasons_name_the_kind() {
        assert_eq!(kind_badge(PreviewKind::Pdf), "PDF");
        assert_eq!(kind_badge(PreviewKind::Unsupported), "File");
        assert_eq!(
            media_error_reason(PreviewKind::Video),
            "the browser could not play this video"
        );
        assert_eq!(page_label(2, 5), "Page 2 of 5");
    }
}
