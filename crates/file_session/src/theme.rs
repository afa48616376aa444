//! Light/dark theme preference.
//!
//! The preference is plain data; the UI owns the live value in a context and persists it here
//! after every toggle.

use platform_host::{load_pref_with, save_pref_with, PrefsStore};
use serde::{Deserialize, Serialize};

use crate::error::FileSessionError;

/// Preference key holding a serialized [`ThemePreference`].
pub const THEME_PREFS_KEY: &str = "dropvault.theme.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Persisted theme choice.
pub struct ThemePreference {
    /// Dark palette enabled.
    pub dark_mode: bool,
}

impl ThemePreference {
    /// Returns the preference with dark mode flipped.
    pub fn toggled(self) -> Self {
        Self {
            dark_mode: !self.dark_mode,
        }
    }

    /// Class applied to the document root.
    pub const fn root_class(self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}

/// Loads the stored theme preference, if any.
///
/// # Errors
///
/// Returns [`FileSessionError::Prefs`] when the store or JSON decoding fails.
pub async fn load_theme_preference<S: PrefsStore + ?Sized>(
    store: &S,
) -> Result<Option<ThemePreference>, FileSessionError> {
    load_pref_with(store, THEME_PREFS_KEY)
        .await
        .map_err(FileSessionError::Prefs)
}

/// Persists the theme preference.
///
/// # Errors
///
/// Returns [`FileSessionError::Prefs`] when serialization or the store write fails.
pub async fn save_theme_preference<S: PrefsStore + ?Sized>(
    store: &S,
    preference: ThemePreference,
) -> Result<(), FileSessionError> {
    save_pref_with(store, THEME_PREFS_KEY, &preference)
        .await
        .map_err(FileSessionError::Prefs)
}
