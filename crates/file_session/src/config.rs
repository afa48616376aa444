//! Session tuning loaded from the preference store.

use std::time::Duration;

use platform_host::{load_pref_with, PrefsStore};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Preference key holding a serialized [`FileSessionConfig`].
pub const SESSION_CONFIG_PREFS_KEY: &str = "dropvault.session.config.v1";

const MIN_TICK_INTERVAL_MS: u32 = 16;
const MAX_TICK_INTERVAL_MS: u32 = 10_000;
const MAX_PROGRESS_INCREMENT: f64 = 100.0;
const MIN_TEXT_PREVIEW_LIMIT_BYTES: usize = 1024;
const MAX_TEXT_PREVIEW_LIMIT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Tunables for upload simulation and preview loading.
pub struct FileSessionConfig {
    /// Delay between upload ticks.
    pub upload_tick_interval_ms: u32,
    /// Upper bound (exclusive) of one random progress step, in percent.
    pub max_progress_increment: f64,
    /// Maximum bytes decoded for a text or code preview.
    pub text_preview_limit_bytes: usize,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            upload_tick_interval_ms: 200,
            max_progress_increment: 30.0,
            text_preview_limit_bytes: 512 * 1024,
        }
    }
}

impl FileSessionConfig {
    /// Clamps every field into its supported range.
    ///
    /// A non-finite or non-positive increment falls back to the default so uploads keep
    /// progressing.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.upload_tick_interval_ms = self
            .upload_tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.max_progress_increment = if self.max_progress_increment.is_finite()
            && self.max_progress_increment > 0.0
        {
            self.max_progress_increment.min(MAX_PROGRESS_INCREMENT)
        } else {
            defaults.max_progress_increment
        };
        self.text_preview_limit_bytes = self
            .text_preview_limit_bytes
            .clamp(MIN_TEXT_PREVIEW_LIMIT_BYTES, MAX_TEXT_PREVIEW_LIMIT_BYTES);
        self
    }

    /// Delay between upload ticks as a [`Duration`].
    pub fn upload_tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.upload_tick_interval_ms))
    }

    /// Loads the stored config, falling back to defaults when it is missing or unreadable.
    pub async fn load_with<S: PrefsStore + ?Sized>(store: &S) -> Self {
        match load_pref_with::<_, Self>(store, SESSION_CONFIG_PREFS_KEY).await {
            Ok(Some(config)) => config.normalized(),
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(error = %err, "session config load failed; using defaults");
                Self::default()
            }
        }
    }
}
