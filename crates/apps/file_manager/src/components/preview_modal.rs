use file_session::{
    format_file_size, format_upload_date, FileEntry, PreviewContent, PreviewKind, PreviewPhase,
    PreviewSession, PreviewToken, SessionAction,
};
use leptos::*;

use crate::{
    presentation::{kind_badge, media_error_reason, page_label, preview_status},
    use_file_manager, FileManagerContext,
};

#[component]
pub(crate) fn PreviewModal() -> impl IntoView {
    let fm = use_file_manager();
    let session = create_memo(move |_| fm.select(None, |s| s.preview.clone()));
    let token = create_memo(move |_| session.with(|s| s.as_ref().map(|s| s.token)));

    move || {
        token.get()?;
        let opened = session.get_untracked()?;
        Some(view! { <PreviewDialog opened=opened session=session /> })
    }
}

#[component]
fn PreviewDialog(
    /// Session as it was when opened; fixed for the lifetime of this dialog.
    opened: PreviewSession,
    /// Live session, for phase and content updates.
    session: Memo<Option<PreviewSession>>,
) -> impl IntoView {
    let fm = use_file_manager();
    let file = opened.file.clone();
    let id = file.id;
    let title_id = format!("preview-title-{}", opened.token.0);
    let status = move || session.with(|s| s.as_ref().and_then(preview_status));

    let body = if opened.kind.is_media() {
        media_element(fm, opened.token, &file, session).into_view()
    } else {
        let file = file.clone();
        (move || {
            let current = session.get()?;
            let content = current.content?;
            Some(render_content(fm, &file, content))
        })
        .into_view()
    };

    view! {
        <div
            class="preview-backdrop"
            on:click=move |_| fm.dispatch_action(SessionAction::ClosePreview)
        >
            <div
                class=format!("preview-dialog preview-{}", opened.kind.as_str())
                role="dialog"
                aria-modal="true"
                aria-labelledby=title_id.clone()
                on:click=|ev: ev::MouseEvent| ev.stop_propagation()
            >
                <header class="preview-header">
                    <div>
                        <h2 id=title_id>{file.name.clone()}</h2>
                        <p class="preview-meta">
                            {format!("{} · {}", kind_badge(opened.kind), format_file_size(file.size))}
                        </p>
                    </div>
                    <div class="preview-actions">
                        <button
                            type="button"
                            on:click=move |_| fm.dispatch_action(SessionAction::Download { id })
                        >
                            "Download"
                        </button>
                        <button
                            type="button"
                            aria-label="Close preview"
                            on:click=move |_| fm.dispatch_action(SessionAction::ClosePreview)
                        >
                            "Close"
                        </button>
                    </div>
                </header>
                {move || {
                    status()
                        .map(|line| {
                            let failed = session
                                .with(|s| {
                                    s.as_ref()
                                        .is_some_and(|s| matches!(s.phase, PreviewPhase::Error(_)))
                                });
                            view! {
                                <p class=if failed { "preview-status error" } else { "preview-status" }>
                                    {line}
                                </p>
                            }
                        })
                }}
                <div class="preview-body">{body}</div>
            </div>
        </div>
    }
}

/// Media elements render immediately so their load events can settle the session.
fn media_element(
    fm: FileManagerContext,
    token: PreviewToken,
    file: &FileEntry,
    session: Memo<Option<PreviewSession>>,
) -> View {
    let kind = file.kind;
    let url = file.content_url.clone();
    let loaded = move || fm.dispatch_action(SessionAction::PreviewMediaLoaded { token });
    let failed = move || {
        fm.dispatch_action(SessionAction::PreviewMediaFailed {
            token,
            reason: media_error_reason(kind),
        })
    };
    let hidden = move || {
        session.with(|s| {
            s.as_ref()
                .map_or(true, |s| matches!(s.phase, PreviewPhase::Error(_)))
        })
    };

    match kind {
        PreviewKind::Image => view! {
            <img
                class="preview-media"
                class:hidden=hidden
                src=url
                alt=file.name.clone()
                on:load=move |_| loaded()
                on:error=move |_| failed()
            />
        }
        .into_view(),
        PreviewKind::Video => view! {
            <video
                class="preview-media"
                class:hidden=hidden
                src=url
                controls=true
                on:loadeddata=move |_| loaded()
                on:error=move |_| failed()
            ></video>
        }
        .into_view(),
        _ => view! {
            <audio
                class="preview-media"
                class:hidden=hidden
                src=url
                controls=true
                on:loadeddata=move |_| loaded()
                on:error=move |_| failed()
            ></audio>
        }
        .into_view(),
    }
}

fn render_content(fm: FileManagerContext, file: &FileEntry, content: PreviewContent) -> View {
    match content {
        PreviewContent::Pdf(pages) => {
            let can_navigate = pages.can_navigate();
            let first = pages.current_page() <= 1;
            let last = pages.current_page() >= pages.total_pages();
            view! {
                <div class="preview-pdf">
                    <iframe src=pages.page_url(&file.content_url) title=file.name.clone()></iframe>
                    <Show when=move || can_navigate>
                        <nav class="pdf-pager" aria-label="PDF pages">
                            <button
                                type="button"
                                prop:disabled=first
                                on:click=move |_| fm.dispatch_action(SessionAction::PrevPage)
                            >
                                "Previous"
                            </button>
                            <span>{page_label(pages.current_page(), pages.total_pages())}</span>
                            <button
                                type="button"
                                prop:disabled=last
                                on:click=move |_| fm.dispatch_action(SessionAction::NextPage)
                            >
                                "Next"
                            </button>
                        </nav>
                    </Show>
                </div>
            }
            .into_view()
        }
        PreviewContent::Document { html } => {
            view! { <article class="preview-document" inner_html=html></article> }.into_view()
        }
        PreviewContent::Text {
            text,
            language,
            truncated,
        } => view! {
            <pre class=format!("preview-code language-{language}")>
                <code>{text}</code>
            </pre>
            <Show when=move || truncated>
                <p class="preview-note">"Preview truncated. Download the file to see all of it."</p>
            </Show>
        }
        .into_view(),
        PreviewContent::Metadata => {
            let id = file.id;
            let mime = if file.mime_type.is_empty() {
                "unknown".to_string()
            } else {
                file.mime_type.clone()
            };
            view! {
                <div class="preview-metadata">
                    <p>"Preview is not available for this file type."</p>
                    <dl>
                        <dt>"Name"</dt>
                        <dd>{file.name.clone()}</dd>
                        <dt>"Size"</dt>
                        <dd>{format_file_size(file.size)}</dd>
                        <dt>"Type"</dt>
                        <dd>{mime}</dd>
                        <dt>"Uploaded"</dt>
                        <dd>{format_upload_date(file.uploaded_at_unix_ms)}</dd>
                    </dl>
                    <button
                        type="button"
                        on:click=move |_| fm.dispatch_action(SessionAction::Download { id })
                    >
                        "Download"
                    </button>
                </div>
            }
            .into_view()
        }
        PreviewContent::Media => ().into_view(),
    }
}
