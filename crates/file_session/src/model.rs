//! File records, their read-models, and search/sort state.

use std::{fmt, rc::Rc};

use platform_host::{BlobSource, ObjectUrlService};
use serde::{Deserialize, Serialize};

use crate::classifier::{self, FileColor, FileIcon, PreviewKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Registry-allocated file identifier, unique and never reused within a session.
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A file handed over by drag-and-drop or the file picker, before ingestion.
pub struct RawFile {
    /// Filename including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared content type; may be empty.
    pub mime_type: String,
    /// Byte source to mint a locator for.
    pub source: BlobSource,
}

impl RawFile {
    /// Builds a raw file over in-memory bytes; `size` is taken from the buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: BlobSource::from_bytes(bytes),
        }
    }
}

/// Exclusive lease on a content locator; revokes it exactly once on drop.
pub(crate) struct SourceHandle {
    content_url: String,
    object_urls: Rc<dyn ObjectUrlService>,
}

impl SourceHandle {
    pub(crate) fn register(
        object_urls: &Rc<dyn ObjectUrlService>,
        source: BlobSource,
    ) -> Result<Self, String> {
        let content_url = object_urls.register(source)?;
        Ok(Self {
            content_url,
            object_urls: Rc::clone(object_urls),
        })
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.object_urls.revoke(&self.content_url);
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("content_url", &self.content_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
/// One file known to the session. Owns its byte-source locator.
pub struct FileRecord {
    id: FileId,
    name: String,
    size: u64,
    mime_type: String,
    uploaded_at_unix_ms: u64,
    source: SourceHandle,
}

impl FileRecord {
    pub(crate) fn new(
        id: FileId,
        raw: RawFile,
        uploaded_at_unix_ms: u64,
        object_urls: &Rc<dyn ObjectUrlService>,
    ) -> Result<Self, String> {
        let source = SourceHandle::register(object_urls, raw.source)?;
        Ok(Self {
            id,
            name: raw.name,
            size: raw.size,
            mime_type: raw.mime_type,
            uploaded_at_unix_ms,
            source,
        })
    }

    /// Identifier.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Display filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared content type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Ingestion time in unix milliseconds.
    pub fn uploaded_at_unix_ms(&self) -> u64 {
        self.uploaded_at_unix_ms
    }

    /// Locator for the byte source, valid while the record is alive.
    pub fn content_url(&self) -> &str {
        &self.source.content_url
    }

    /// Preview category derived from MIME type and name.
    pub fn preview_kind(&self) -> PreviewKind {
        classifier::classify(&self.mime_type, &self.name)
    }

    /// Builds the cloneable read-model for views.
    pub fn entry(&self, selected: bool) -> FileEntry {
        FileEntry {
            id: self.id,
            name: self.name.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
            uploaded_at_unix_ms: self.uploaded_at_unix_ms,
            content_url: self.source.content_url.clone(),
            selected,
            kind: self.preview_kind(),
            icon: classifier::icon_for(&self.mime_type),
            color: classifier::color_for(&self.mime_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Snapshot of a [`FileRecord`] plus derived presentation tags.
pub struct FileEntry {
    /// Identifier.
    pub id: FileId,
    /// Display filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared content type.
    pub mime_type: String,
    /// Ingestion time in unix milliseconds.
    pub uploaded_at_unix_ms: u64,
    /// Locator; only dereferenceable while the record exists.
    pub content_url: String,
    /// Whether the file is in the selection set.
    pub selected: bool,
    /// Preview category.
    pub kind: PreviewKind,
    /// Icon tag.
    pub icon: FileIcon,
    /// Accent color tag.
    pub color: FileColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Ordering applied to the visible file list.
pub enum SortKey {
    /// Lexicographic by name.
    #[default]
    Name,
    /// Largest first.
    Size,
    /// Newest first.
    Date,
    /// Lexicographic by MIME type.
    Type,
}

impl SortKey {
    /// All keys in menu order.
    pub const ALL: [SortKey; 4] = [Self::Name, Self::Size, Self::Date, Self::Type];

    /// Returns the stable token used by select controls.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Date => "date",
            Self::Type => "type",
        }
    }

    /// Parses a token produced by [`SortKey::as_str`].
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == token)
    }

    /// Returns the menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Sort by Name",
            Self::Size => "Sort by Size",
            Self::Date => "Sort by Date",
            Self::Type => "Sort by Type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// File browser layout.
pub enum ViewMode {
    /// Card grid.
    #[default]
    Grid,
    /// Table rows.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Search filter and sort key applied to the registry.
pub struct SearchSortState {
    /// Case-insensitive substring matched against file names.
    pub search_term: String,
    /// Active ordering.
    pub sort_key: SortKey,
}

impl SearchSortState {
    /// Returns `true` when `name` passes the search filter.
    pub fn matches(&self, name: &str) -> bool {
        let needle = self.search_term.to_lowercase();
        needle.is_empty() || name.to_lowercase().contains(&needle)
    }
}
