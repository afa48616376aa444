//! File manager view components.

mod browser;
mod preview_modal;
mod upload;

use leptos::*;

pub(crate) use browser::{BrowserToolbar, FileBrowser};
pub(crate) use preview_modal::PreviewModal;
pub(crate) use upload::{UploadQueue, UploadZone};

use crate::{presentation::library_summary, theme::use_theme, use_file_manager};

#[component]
pub(crate) fn FileManagerHeader() -> impl IntoView {
    let fm = use_file_manager();
    let summary = move || fm.select("Loading...".to_string(), library_summary);

    view! {
        <header class="file-manager-header">
            <div class="file-manager-title">
                <h1>"DropVault"</h1>
                <p class="file-manager-summary">{summary}</p>
            </div>
            {use_theme().map(|theme| {
                view! {
                    <button
                        type="button"
                        class="theme-toggle"
                        aria-pressed=move || theme.is_dark().to_string()
                        on:click=move |_| theme.toggle()
                    >
                        {move || if theme.is_dark() { "Light mode" } else { "Dark mode" }}
                    </button>
                }
            })}
        </header>
    }
}
