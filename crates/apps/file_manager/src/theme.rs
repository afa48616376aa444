//! Theme context: loads the saved light/dark preference at mount and persists every toggle.

use std::rc::Rc;

use file_session::{load_theme_preference, save_theme_preference, ThemePreference};
use leptos::*;
use platform_host::PrefsStore;

/// Active preference plus whether the user picked it in this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ThemeState {
    preference: ThemePreference,
    chosen_by_user: bool,
}

impl ThemeState {
    /// Adopts the stored preference unless the user already toggled; returns whether it applied.
    fn restore(&mut self, saved: ThemePreference) -> bool {
        if self.chosen_by_user {
            return false;
        }
        self.preference = saved;
        true
    }

    fn toggle(&mut self) -> ThemePreference {
        self.preference = self.preference.toggled();
        self.chosen_by_user = true;
        self.preference
    }
}

#[derive(Clone, Copy)]
/// Leptos context exposing the live [`ThemePreference`].
pub struct ThemeContext {
    state: RwSignal<ThemeState>,
    toggle: Callback<()>,
}

impl ThemeContext {
    /// Current preference (tracked).
    pub fn preference(&self) -> ThemePreference {
        self.state.with(|state| state.preference)
    }

    /// Returns `true` when the dark palette is active (tracked).
    pub fn is_dark(&self) -> bool {
        self.preference().dark_mode
    }

    /// Flips dark mode and persists the new value.
    pub fn toggle(&self) {
        self.toggle.call(());
    }
}

fn apply_root_class(preference: ThemePreference) {
    #[cfg(target_arch = "wasm32")]
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        root.set_class_name(preference.root_class());
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = preference;
}

#[component]
/// Provides [`ThemeContext`] to descendants.
pub fn ThemeProvider(
    /// Store holding the persisted preference.
    prefs: Rc<dyn PrefsStore>,
    children: Children,
) -> impl IntoView {
    let state = create_rw_signal(ThemeState::default());
    let prefs = store_value(prefs);

    spawn_local(async move {
        let store = prefs.get_value();
        match load_theme_preference(store.as_ref()).await {
            Ok(Some(saved)) => state.update(|state| {
                if !state.restore(saved) {
                    logging::log!("theme already toggled; ignoring stored preference");
                }
            }),
            Ok(None) => {}
            Err(err) => logging::warn!("theme load failed: {err}"),
        }
    });

    create_effect(move |_| apply_root_class(state.with(|state| state.preference)));

    let toggle = Callback::new(move |()| {
        let mut next = ThemePreference::default();
        state.update(|state| next = state.toggle());
        let store = prefs.get_value();
        spawn_local(async move {
            if let Err(err) = save_theme_preference(store.as_ref(), next).await {
                logging::warn!("theme save failed: {err}");
            }
        });
    });

    provide_context(ThemeContext { state, toggle });

    children().into_view()
}

/// Returns the [`ThemeContext`], if a [`ThemeProvider`] is mounted above.
pub fn use_theme() -> Option<ThemeContext> {
    use_context::<ThemeContext>()
}
