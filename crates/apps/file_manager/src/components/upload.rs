use file_session::{SessionAction, UploadProgress};
use leptos::*;

use crate::{
    picker::raw_files_from_list,
    presentation::{progress_label, progress_width},
    use_file_manager,
};

#[component]
pub(crate) fn UploadZone() -> impl IntoView {
    let fm = use_file_manager();
    let dragging = create_rw_signal(false);
    let input_ref = create_node_ref::<html::Input>();

    let submit = move |files: Option<web_sys::FileList>| {
        let Some(files) = files else {
            return;
        };
        let picked = raw_files_from_list(&files);
        if !picked.is_empty() {
            fm.dispatch_action(SessionAction::AddFiles(picked));
        }
    };

    view! {
        <div
            class=move || if dragging.get() { "upload-zone dragging" } else { "upload-zone" }
            role="button"
            tabindex="0"
            aria-label="Upload files"
            on:click=move |_| {
                if let Some(input) = input_ref.get() {
                    input.click();
                }
            }
            on:keydown=move |ev: ev::KeyboardEvent| {
                if matches!(ev.key().as_str(), "Enter" | " ") {
                    ev.prevent_default();
                    if let Some(input) = input_ref.get() {
                        input.click();
                    }
                }
            }
            on:dragover=move |ev: ev::DragEvent| {
                ev.prevent_default();
                dragging.set(true);
            }
            on:dragleave=move |_| dragging.set(false)
            on:drop=move |ev: ev::DragEvent| {
                ev.prevent_default();
                dragging.set(false);
                submit(ev.data_transfer().and_then(|transfer| transfer.files()));
            }
        >
            <p class="upload-zone-title">
                {move || if dragging.get() { "Drop files to upload" } else { "Drag & drop files here" }}
            </p>
            <p class="upload-zone-hint">"or click to browse"</p>
            <input
                node_ref=input_ref
                type="file"
                multiple=true
                class="upload-zone-input"
                style="display: none"
                on:click=|ev: ev::MouseEvent| ev.stop_propagation()
                on:change=move |ev| {
                    let input: web_sys::HtmlInputElement = event_target(&ev);
                    submit(input.files());
                    input.set_value("");
                }
            />
        </div>
    }
}

#[component]
pub(crate) fn UploadQueue() -> impl IntoView {
    let fm = use_file_manager();
    let uploads = create_memo(move |_| fm.select(Vec::new(), |s| s.uploads.clone()));

    view! {
        <Show when=move || uploads.with(|u| !u.is_empty())>
            <section class="upload-queue" aria-label="Uploads in progress">
                <h2>"Uploading"</h2>
                <ul class="upload-list">
                    <For
                        each=move || uploads.get()
                        key=|upload| (upload.file_id, upload.progress.to_bits())
                        children=move |upload: UploadProgress| {
                            view! {
                                <li class="upload-item">
                                    <span class="upload-name">{upload.file_name}</span>
                                    <div
                                        class="progress-bar"
                                        role="progressbar"
                                        aria-valuemin="0"
                                        aria-valuemax="100"
                                        aria-valuenow=upload.progress.round().to_string()
                                    >
                                        <div
                                            class="progress-fill"
                                            style=format!("width: {}", progress_width(upload.progress))
                                        ></div>
                                    </div>
                                    <span class="upload-percent">{progress_label(upload.progress)}</span>
                                </li>
                            }
                        }
                    />
                </ul>
            </section>
        </Show>
    }
}
