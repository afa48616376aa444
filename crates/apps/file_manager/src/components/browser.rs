use file_session::{
    format_file_size, format_upload_date, FileEntry, FileId, SessionAction, SortKey, ViewMode,
};
use leptos::*;

use crate::{
    presentation::{bulk_delete_label, empty_state_message, item_class, kind_badge},
    use_file_manager, FileManagerContext,
};

#[component]
pub(crate) fn BrowserToolbar() -> impl IntoView {
    let fm = use_file_manager();
    let search_term = move || fm.select(String::new(), |s| s.search.search_term.clone());
    let sort_key = move || fm.select(SortKey::default(), |s| s.search.sort_key);
    let view_mode = move || fm.select(ViewMode::default(), |s| s.view_mode);
    let all_selected = move || fm.select(false, |s| s.all_visible_selected);
    let has_visible = move || fm.select(false, |s| !s.visible.is_empty());
    let delete_label = move || fm.select(None, |s| bulk_delete_label(s.selected_count));

    view! {
        <div class="app-toolbar file-toolbar">
            <label class="select-all">
                <input
                    type="checkbox"
                    prop:checked=all_selected
                    prop:disabled=move || !has_visible()
                    on:change=move |ev| {
                        let action = if event_target_checked(&ev) {
                            SessionAction::SelectAllVisible
                        } else {
                            SessionAction::ClearSelection
                        };
                        fm.dispatch_action(action);
                    }
                />
                "Select all"
            </label>
            <input
                type="search"
                class="file-search"
                placeholder="Search files..."
                aria-label="Search files"
                prop:value=search_term
                on:input=move |ev| {
                    fm.dispatch_action(SessionAction::SetSearchTerm(event_target_value(&ev)));
                }
            />
            <select
                class="file-sort"
                aria-label="Sort files"
                prop:value=move || sort_key().as_str()
                on:change=move |ev| {
                    if let Some(key) = SortKey::from_token(&event_target_value(&ev)) {
                        fm.dispatch_action(SessionAction::SetSortKey(key));
                    }
                }
            >
                {SortKey::ALL
                    .into_iter()
                    .map(|key| view! { <option value=key.as_str()>{key.label()}</option> })
                    .collect_view()}
            </select>
            <div class="view-toggle" role="group" aria-label="Layout">
                <button
                    type="button"
                    aria-pressed=move || (view_mode() == ViewMode::Grid).to_string()
                    on:click=move |_| fm.dispatch_action(SessionAction::SetViewMode(ViewMode::Grid))
                >
                    "Grid"
                </button>
                <button
                    type="button"
                    aria-pressed=move || (view_mode() == ViewMode::List).to_string()
                    on:click=move |_| fm.dispatch_action(SessionAction::SetViewMode(ViewMode::List))
                >
                    "List"
                </button>
            </div>
            {move || {
                delete_label()
                    .map(|label| {
                        view! {
                            <button
                                type="button"
                                class="danger"
                                on:click=move |_| fm.dispatch_action(SessionAction::RemoveSelected)
                            >
                                {label}
                            </button>
                        }
                    })
            }}
        </div>
    }
}

#[component]
pub(crate) fn FileBrowser() -> impl IntoView {
    let fm = use_file_manager();
    let entries = create_memo(move |_| fm.select(Vec::new(), |s| s.visible.clone()));
    let is_grid = create_memo(move |_| fm.select(true, |s| s.view_mode == ViewMode::Grid));
    let empty_message = create_memo(move |_| {
        fm.select(None, |s| {
            s.visible
                .is_empty()
                .then(|| empty_state_message(&s.search, s.total_files))
        })
    });

    let items = move || entries.get();
    let key = |entry: &FileEntry| (entry.id, entry.selected);

    view! {
        <section class="file-browser" aria-label="Files">
            {move || {
                if let Some(message) = empty_message.get() {
                    return view! { <p class="file-browser-empty">{message}</p> }.into_view();
                }
                if is_grid.get() {
                    view! {
                        <div class="file-grid">
                            <For
                                each=items
                                key=key
                                children=move |entry| view! { <FileCard entry=entry /> }
                            />
                        </div>
                    }
                        .into_view()
                } else {
                    view! {
                        <table class="file-list" role="grid">
                            <thead>
                                <tr>
                                    <th></th>
                                    <th>"Name"</th>
                                    <th>"Size"</th>
                                    <th>"Type"</th>
                                    <th>"Uploaded"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=items
                                    key=key
                                    children=move |entry| view! { <FileRow entry=entry /> }
                                />
                            </tbody>
                        </table>
                    }
                        .into_view()
                }
            }}
        </section>
    }
}

fn selection_box(fm: FileManagerContext, id: FileId, name: &str, selected: bool) -> impl IntoView {
    view! {
        <input
            type="checkbox"
            class="file-select"
            aria-label=format!("Select {name}")
            prop:checked=selected
            on:click=|ev: ev::MouseEvent| ev.stop_propagation()
            on:change=move |_| fm.dispatch_action(SessionAction::ToggleSelect { id })
        />
    }
}

#[component]
fn FileActions(id: FileId) -> impl IntoView {
    let fm = use_file_manager();
    let run = move |ev: ev::MouseEvent, action: SessionAction| {
        ev.stop_propagation();
        fm.dispatch_action(action);
    };

    view! {
        <div class="file-actions">
            <button type="button" on:click=move |ev| run(ev, SessionAction::OpenPreview { id })>
                "Preview"
            </button>
            <button type="button" on:click=move |ev| run(ev, SessionAction::Download { id })>
                "Download"
            </button>
            <button
                type="button"
                class="danger"
                on:click=move |ev| run(ev, SessionAction::RemoveFile { id })
            >
                "Delete"
            </button>
        </div>
    }
}

#[component]
fn FileCard(entry: FileEntry) -> impl IntoView {
    let fm = use_file_manager();
    let id = entry.id;

    view! {
        <article
            class=item_class("file-card", &entry)
            on:click=move |_| fm.dispatch_action(SessionAction::OpenPreview { id })
        >
            {selection_box(fm, id, &entry.name, entry.selected)}
            <span
                class=format!("file-icon {}", entry.color.css_class())
                data-icon=entry.icon.as_str()
            >
                {kind_badge(entry.kind)}
            </span>
            <h3 class="file-name" title=entry.name.clone()>{entry.name.clone()}</h3>
            <p class="file-meta">
                {format!(
                    "{} · {}",
                    format_file_size(entry.size),
                    format_upload_date(entry.uploaded_at_unix_ms),
                )}
            </p>
            <FileActions id=id />
        </article>
    }
}

#[component]
fn FileRow(entry: FileEntry) -> impl IntoView {
    let fm = use_file_manager();
    let id = entry.id;
    let mime = if entry.mime_type.is_empty() {
        "unknown".to_string()
    } else {
        entry.mime_type.clone()
    };

    view! {
        <tr
            class=item_class("file-row", &entry)
            on:dblclick=move |_| fm.dispatch_action(SessionAction::OpenPreview { id })
        >
            <td>{selection_box(fm, id, &entry.name, entry.selected)}</td>
            <td class="file-name">
                <span
                    class=format!("file-icon {}", entry.color.css_class())
                    data-icon=entry.icon.as_str()
                >
                    {kind_badge(entry.kind)}
                </span>
                {entry.name.clone()}
            </td>
            <td>{format_file_size(entry.size)}</td>
            <td>{mime}</td>
            <td>{format_upload_date(entry.uploaded_at_unix_ms)}</td>
            <td>
                <FileActions id=id />
            </td>
        </tr>
    }
}
