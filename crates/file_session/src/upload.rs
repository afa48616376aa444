//! Simulated upload progress.
//!
//! Each ingested file gets one [`UploadTask`] that advances by a random increment per tick until it
//! reaches [`UPLOAD_COMPLETE`]. Completion is reported once and the task is dropped from the active
//! set. There is no failure path.

use std::{collections::BTreeMap, fmt};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::model::FileId;

/// Progress value of a finished upload.
pub const UPLOAD_COMPLETE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Lifecycle position of one simulated upload.
pub enum UploadState {
    /// Created, no progress yet.
    Pending,
    /// Strictly between 0 and 100.
    InProgress(f64),
    /// Reached 100; terminal.
    Complete,
}

impl UploadState {
    /// Derives the state for a progress value in `[0, 100]`.
    pub fn from_progress(progress: f64) -> Self {
        if progress >= UPLOAD_COMPLETE {
            Self::Complete
        } else if progress > 0.0 {
            Self::InProgress(progress)
        } else {
            Self::Pending
        }
    }

    /// Returns the progress percentage for this state.
    pub fn progress(self) -> f64 {
        match self {
            Self::Pending => 0.0,
            Self::InProgress(progress) => progress,
            Self::Complete => UPLOAD_COMPLETE,
        }
    }
}

/// Source of per-tick progress increments.
pub trait ProgressSource {
    /// Returns an increment in `[0, max)`.
    fn next_increment(&mut self, max: f64) -> f64;
}

/// Uniform random increments from a small seeded RNG.
pub struct RandomProgress {
    rng: SmallRng,
}

impl RandomProgress {
    /// Creates a source seeded with `seed` (typically the current unix time).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl fmt::Debug for RandomProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomProgress").finish_non_exhaustive()
    }
}

impl ProgressSource for RandomProgress {
    fn next_increment(&mut self, max: f64) -> f64 {
        if max.is_nan() || max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..max)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One in-flight simulated upload. `file_id` is a lookup key only.
pub struct UploadTask {
    /// File being uploaded.
    pub file_id: FileId,
    /// Name used in the completion notification.
    pub file_name: String,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
}

impl UploadTask {
    /// Returns the lifecycle state derived from `progress`.
    pub fn state(&self) -> UploadState {
        UploadState::from_progress(self.progress)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of advancing one task.
pub enum UploadEvent {
    /// The task moved but has not finished.
    Progressed {
        /// File being uploaded.
        file_id: FileId,
        /// New percentage.
        progress: f64,
    },
    /// The task reached 100 and was removed.
    Completed {
        /// File that finished.
        file_id: FileId,
        /// Its name, for the success notification.
        file_name: String,
    },
}

/// Owns the active upload tasks, keyed and ordered by file id.
pub struct UploadSimulator {
    tasks: BTreeMap<FileId, UploadTask>,
    source: Box<dyn ProgressSource>,
    max_increment: f64,
}

impl fmt::Debug for UploadSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSimulator")
            .field("tasks", &self.tasks)
            .field("max_increment", &self.max_increment)
            .finish_non_exhaustive()
    }
}

impl UploadSimulator {
    /// Creates an idle simulator drawing increments in `[0, max_increment)` from `source`.
    pub fn new(source: Box<dyn ProgressSource>, max_increment: f64) -> Self {
        Self {
            tasks: BTreeMap::new(),
            source,
            max_increment,
        }
    }

    /// Starts a task for `file_id` at 0%. Returns `false` if one is already running.
    pub fn start(&mut self, file_id: FileId, file_name: impl Into<String>) -> bool {
        if self.tasks.contains_key(&file_id) {
            return false;
        }
        self.tasks.insert(
            file_id,
            UploadTask {
                file_id,
                file_name: file_name.into(),
                progress: 0.0,
            },
        );
        true
    }

    /// Advances one task by a single tick.
    ///
    /// Returns `None` when no task exists for `file_id` (never started, completed, or cancelled).
    pub fn tick_task(&mut self, file_id: FileId) -> Option<UploadEvent> {
        let task = self.tasks.get_mut(&file_id)?;
        let increment = self
            .source
            .next_increment(self.max_increment)
            .clamp(0.0, UPLOAD_COMPLETE);
        task.progress = (task.progress + increment).min(UPLOAD_COMPLETE);
        if task.progress < UPLOAD_COMPLETE {
            return Some(UploadEvent::Progressed {
                file_id,
                progress: task.progress,
            });
        }

        let task = self.tasks.remove(&file_id)?;
        Some(UploadEvent::Completed {
            file_id,
            file_name: task.file_name,
        })
    }

    /// Advances every active task once, in file id order.
    pub fn tick_all(&mut self) -> Vec<UploadEvent> {
        let ids: Vec<FileId> = self.tasks.keys().copied().collect();
        ids.into_iter()
            .filter_map(|file_id| self.tick_task(file_id))
            .collect()
    }

    /// Drops the task for `file_id` without reporting completion.
    pub fn cancel(&mut self, file_id: FileId) -> Option<UploadTask> {
        self.tasks.remove(&file_id)
    }

    /// Returns the current percentage for an active task.
    pub fn progress(&self, file_id: FileId) -> Option<f64> {
        self.tasks.get(&file_id).map(|task| task.progress)
    }

    /// Iterates active tasks in file id order.
    pub fn active(&self) -> impl Iterator<Item = &UploadTask> + '_ {
        self.tasks.values()
    }

    /// Returns `true` when no upload is in flight.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}
