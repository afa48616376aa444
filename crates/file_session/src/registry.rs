//! In-memory ordered file collection with a separate selection set.

use std::{cmp::Ordering, collections::BTreeSet, rc::Rc};

use platform_host::ObjectUrlService;
use tracing::{debug, warn};

use crate::{
    error::FileSessionError,
    model::{FileEntry, FileId, FileRecord, RawFile, SearchSortState, SortKey},
};

#[derive(Debug, Clone, PartialEq)]
/// A raw file that could not be ingested.
pub struct RejectedFile {
    /// Name of the rejected file.
    pub name: String,
    /// Why it was rejected.
    pub reason: FileSessionError,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Result of [`FileRegistry::add`].
pub struct IngestReport {
    /// Newly created records, in input order.
    pub added: Vec<FileEntry>,
    /// Inputs whose byte source could not be registered.
    pub rejected: Vec<RejectedFile>,
}

#[derive(Debug)]
/// Owns every [`FileRecord`] in insertion order plus the selection set.
///
/// Selection is only ever a subset of registry membership: removing a record drops its id from
/// the selection, and selecting an unknown id does nothing.
pub struct FileRegistry {
    records: Vec<FileRecord>,
    selection: BTreeSet<FileId>,
    next_id: u64,
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            selection: BTreeSet::new(),
            next_id: 1,
        }
    }
}

impl FileRegistry {
    /// Ingests raw files, minting one locator per file through `object_urls`.
    pub fn add(
        &mut self,
        files: Vec<RawFile>,
        object_urls: &Rc<dyn ObjectUrlService>,
        now_unix_ms: u64,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        for raw in files {
            let name = raw.name.clone();
            let id = FileId(self.next_id);
            match FileRecord::new(id, raw, now_unix_ms, object_urls) {
                Ok(record) => {
                    self.next_id += 1;
                    report.added.push(record.entry(false));
                    self.records.push(record);
                }
                Err(err) => {
                    warn!(file = %name, error = %err, "file source registration failed");
                    report.rejected.push(RejectedFile {
                        name,
                        reason: FileSessionError::SourceRegistration(err),
                    });
                }
            }
        }
        report
    }

    /// Removes every record whose id is in `ids`, releasing each locator once.
    ///
    /// Unknown ids are ignored. Returns entries for the removed records in registry order.
    pub fn remove(&mut self, ids: &[FileId]) -> Vec<FileEntry> {
        let wanted: BTreeSet<FileId> = ids.iter().copied().collect();
        let (removed, kept): (Vec<FileRecord>, Vec<FileRecord>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| wanted.contains(&record.id()));
        self.records = kept;

        let entries = removed
            .iter()
            .map(|record| record.entry(self.selection.contains(&record.id())))
            .collect::<Vec<_>>();
        for id in &wanted {
            self.selection.remove(id);
        }
        if entries.len() < wanted.len() {
            debug!(
                requested = wanted.len(),
                removed = entries.len(),
                "remove skipped unknown file ids"
            );
        }
        drop(removed);
        entries
    }

    /// Looks up a record.
    pub fn get(&self, id: FileId) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Builds the read-model for one record.
    pub fn entry(&self, id: FileId) -> Option<FileEntry> {
        self.get(id)
            .map(|record| record.entry(self.selection.contains(&id)))
    }

    /// Returns `true` when `id` is a live record.
    pub fn contains(&self, id: FileId) -> bool {
        self.get(id).is_some()
    }

    /// Flips selection for `id`. Returns the new state, or `None` for unknown ids.
    pub fn toggle_select(&mut self, id: FileId) -> Option<bool> {
        if !self.contains(id) {
            debug!(%id, "toggle select on unknown file ignored");
            return None;
        }
        if self.selection.remove(&id) {
            Some(false)
        } else {
            self.selection.insert(id);
            Some(true)
        }
    }

    /// Adds every known id to the selection; unknown ids are skipped.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = FileId>) {
        for id in ids {
            if self.contains(id) {
                self.selection.insert(id);
            }
        }
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns selected ids in registry order.
    pub fn selected_ids(&self) -> Vec<FileId> {
        self.records
            .iter()
            .map(FileRecord::id)
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: FileId) -> bool {
        self.selection.contains(&id)
    }

    /// Filters by search term, then stably sorts by the active key.
    pub fn visible_files(&self, state: &SearchSortState) -> Vec<&FileRecord> {
        let mut visible: Vec<&FileRecord> = self
            .records
            .iter()
            .filter(|record| state.matches(record.name()))
            .collect();
        visible.sort_by(|a, b| compare(state.sort_key, a, b));
        visible
    }

    /// Read-models for [`FileRegistry::visible_files`].
    pub fn visible_entries(&self, state: &SearchSortState) -> Vec<FileEntry> {
        self.visible_files(state)
            .into_iter()
            .map(|record| record.entry(self.selection.contains(&record.id())))
            .collect()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all record sizes.
    pub fn total_size(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |sum, record| sum.saturating_add(record.size()))
    }
}

fn compare(key: SortKey, a: &FileRecord, b: &FileRecord) -> Ordering {
    match key {
        SortKey::Name => a
            .name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name())),
        SortKey::Size => b.size().cmp(&a.size()),
        SortKey::Date => b.uploaded_at_unix_ms().cmp(&a.uploaded_at_unix_ms()),
        SortKey::Type => a.mime_type().cmp(b.mime_type()),
    }
}
