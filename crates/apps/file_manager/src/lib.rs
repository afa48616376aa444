//! DropVault file manager UI: upload zone, upload queue, file browser, and preview modal.
//!
//! [`FileManagerApp`] boots a [`file_session::SessionRuntime`] against the injected host services
//! and mirrors its snapshots into a signal. Views never touch the session directly; they dispatch
//! [`SessionAction`] values through [`FileManagerContext`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod components;
pub mod picker;
pub mod presentation;
mod slot;
pub mod theme;

use std::{rc::Rc, time::Duration};

use file_session::{SessionAction, SessionRuntime, SessionSnapshot};
use leptos::*;
use platform_host::HostServices;

use crate::{
    components::{
        BrowserToolbar, FileBrowser, FileManagerHeader, PreviewModal, UploadQueue, UploadZone,
    },
    slot::SessionSlot,
};
pub use crate::theme::{use_theme, ThemeContext, ThemeProvider};

#[derive(Clone, Copy)]
/// Leptos context for reading session snapshots and dispatching [`SessionAction`] values.
pub struct FileManagerContext {
    /// Latest session snapshot; `None` until the runtime has booted.
    pub snapshot: RwSignal<Option<SessionSnapshot>>,
    /// Action dispatch callback.
    pub dispatch: Callback<SessionAction>,
}

impl FileManagerContext {
    /// Dispatches an action through the context callback.
    pub fn dispatch_action(&self, action: SessionAction) {
        self.dispatch.call(action);
    }

    /// Reads a value from the current snapshot, or `fallback` before boot (tracked).
    pub fn select<T>(&self, fallback: T, f: impl FnOnce(&SessionSnapshot) -> T) -> T {
        self.snapshot.with(|snapshot| snapshot.as_ref().map(f).unwrap_or(fallback))
    }
}

/// Returns the current [`FileManagerContext`].
///
/// # Panics
///
/// Panics if called outside [`FileManagerApp`].
pub(crate) fn use_file_manager() -> FileManagerContext {
    use_context::<FileManagerContext>().expect("FileManagerContext not provided")
}

#[component]
/// DropVault file manager.
///
/// Loads session configuration from the host preference store, drives upload ticks on the
/// configured interval, and routes the cancel key to the open preview.
pub fn FileManagerApp(
    /// Browser or in-memory host bundle assembled by the entry layer.
    host_services: HostServices,
) -> impl IntoView {
    let snapshot = create_rw_signal::<Option<SessionSnapshot>>(None);
    let tick_interval = create_rw_signal::<Option<Duration>>(None);
    let slot = store_value(SessionSlot::default());

    let dispatch = Callback::new(move |action: SessionAction| {
        let routed = slot.try_update_value(|slot| slot.accept(action)).flatten();
        match routed {
            Some((runtime, action)) => {
                spawn_local(async move { runtime.dispatch(action).await });
            }
            None => {
                let pending = slot.with_value(SessionSlot::pending_len);
                logging::log!("file session booting; {pending} action(s) queued");
            }
        }
    });

    spawn_local(async move {
        let session = Rc::new(SessionRuntime::load(host_services).await);
        session.subscribe(Rc::new(move |next: SessionSnapshot| snapshot.set(Some(next))));
        snapshot.set(Some(session.snapshot()));
        tick_interval.set(Some(session.config().upload_tick_interval()));
        logging::log!(
            "file session ready ({} host)",
            platform_host_web::host_strategy_name()
        );
        let queued = slot
            .try_update_value(|slot| slot.ready(Rc::clone(&session)))
            .unwrap_or_default();
        for action in queued {
            session.dispatch(action).await;
        }
    });

    create_effect(move |_| {
        let Some(interval) = tick_interval.get() else {
            return;
        };
        if let Ok(handle) = set_interval_with_handle(
            move || {
                let uploading = snapshot
                    .with_untracked(|s| s.as_ref().is_some_and(|s| !s.uploads.is_empty()));
                if uploading {
                    dispatch.call(SessionAction::TickUploads);
                }
            },
            interval,
        ) {
            on_cleanup(move || handle.clear());
        }
    });

    let key_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() {
            return;
        }
        let previewing =
            snapshot.with_untracked(|s| s.as_ref().is_some_and(|s| s.preview.is_some()));
        if previewing {
            dispatch.call(SessionAction::KeyPressed { key: ev.key() });
        }
    });
    on_cleanup(move || key_listener.remove());

    provide_context(FileManagerContext { snapshot, dispatch });

    view! {
        <div class="app-shell file-manager-shell">
            <FileManagerHeader />
            <UploadZone />
            <UploadQueue />
            <BrowserToolbar />
            <FileBrowser />
            <PreviewModal />
        </div>
    }
}
