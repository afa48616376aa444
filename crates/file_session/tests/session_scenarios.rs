use std::{collections::VecDeque, io::Write, rc::Rc};

use file_session::{
    classify, color_for, language_for, FileColor, FileId, FileSessionConfig, PreviewContent,
    PreviewKind, PreviewPhase, PreviewState, ProgressSource, RawFile, SessionAction,
    SessionEffect, SessionRuntime, SortKey,
};
use futures::executor::block_on;
use platform_host::{
    HostServices, ManualClock, MemoryNotificationService, MemoryObjectUrlService,
    MemoryPrefsStore, NotificationLevel,
};
use pretty_assertions::assert_eq;

struct ScriptedProgress(VecDeque<f64>);

impl ProgressSource for ScriptedProgress {
    fn next_increment(&mut self, max: f64) -> f64 {
        self.0.pop_front().unwrap_or(max)
    }
}

struct Fixture {
    runtime: SessionRuntime,
    urls: MemoryObjectUrlService,
    notifications: MemoryNotificationService,
    clock: Rc<ManualClock>,
}

fn fixture(steps: &[f64]) -> Fixture {
    let urls = MemoryObjectUrlService::default();
    let notifications = MemoryNotificationService::default();
    let clock = Rc::new(ManualClock::new(1_700_000_000_000));
    let host = HostServices {
        object_urls: Rc::new(urls.clone()),
        notifications: Rc::new(notifications.clone()),
        prefs: Rc::new(MemoryPrefsStore::default()),
        clock: clock.clone(),
    };
    let runtime = SessionRuntime::with_progress(
        host,
        FileSessionConfig::default(),
        Box::new(ScriptedProgress(steps.iter().copied().collect())),
    );
    Fixture {
        runtime,
        urls,
        notifications,
        clock,
    }
}

fn ingest(fixture: &Fixture, files: Vec<RawFile>) {
    block_on(fixture.runtime.dispatch(SessionAction::AddFiles(files)));
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!("<w:document><w:body>{body}</w:body></w:document>");
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        zip.start_file("word/document.xml", zip::write::FileOptions::default())
            .expect("start document part");
        zip.write_all(xml.as_bytes()).expect("write document part");
        zip.finish().expect("finish docx");
    }
    buffer
}

#[test]
fn photo_upload_completes_and_previews_after_media_event() {
    let f = fixture(&[40.0, 40.0, 40.0]);
    ingest(
        &f,
        vec![RawFile::from_bytes("photo.jpg", "image/jpeg", vec![0xFF; 2048])],
    );

    let snapshot = f.runtime.snapshot();
    assert_eq!(snapshot.total_files, 1);
    let entry = &snapshot.visible[0];
    assert_eq!(entry.size, 2048);
    assert_eq!(entry.kind, PreviewKind::Image);
    assert_eq!(entry.color, FileColor::Green);

    for _ in 0..3 {
        block_on(f.runtime.dispatch(SessionAction::TickUploads));
    }
    assert!(f.runtime.snapshot().uploads.is_empty());
    assert_eq!(
        f.notifications.messages(NotificationLevel::Success),
        vec!["photo.jpg uploaded successfully!".to_string()]
    );

    block_on(f.runtime.dispatch(SessionAction::OpenPreview { id: entry.id }));
    assert_eq!(f.runtime.snapshot().preview_state, PreviewState::Loading);
    let token = f
        .runtime
        .snapshot()
        .preview
        .map(|preview| preview.token)
        .expect("preview open");
    block_on(f.runtime.dispatch(SessionAction::PreviewMediaLoaded { token }));

    let preview = f.runtime.snapshot().preview.expect("preview open");
    assert_eq!(preview.kind, PreviewKind::Image);
    assert_eq!(preview.phase, PreviewPhase::Ready);
}

#[test]
fn script_without_mime_type_previews_as_python_code() {
    assert_eq!(classify("", "script.py"), PreviewKind::Code);
    assert_eq!(language_for("script.py"), "python");

    let f = fixture(&[]);
    ingest(&f, vec![RawFile::from_bytes("script.py", "", b"print('hi')\n".to_vec())]);
    block_on(f.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));

    let preview = f.runtime.snapshot().preview.expect("preview open");
    assert_eq!(preview.kind, PreviewKind::Code);
    assert_eq!(
        preview.content,
        Some(PreviewContent::Text {
            text: "print('hi')\n".to_string(),
            language: "python".to_string(),
            truncated: false,
        })
    );
}

#[test]
fn removal_releases_locators_exactly_once_and_teardown_leaks_nothing() {
    let f = fixture(&[]);
    ingest(
        &f,
        vec![
            RawFile::from_bytes("f1.txt", "text/plain", b"one".to_vec()),
            RawFile::from_bytes("f2.txt", "text/plain", b"two".to_vec()),
        ],
    );
    let before = f.runtime.snapshot();
    let (f1, f2) = (before.visible[0].clone(), before.visible[1].clone());

    block_on(f.runtime.dispatch(SessionAction::RemoveFile { id: f1.id }));
    let after = f.runtime.snapshot();
    assert_eq!(
        after.visible.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![f2.id]
    );
    assert_eq!(f.urls.revocation_count(&f1.content_url), 1);
    assert_eq!(f.urls.revocation_count(&f2.content_url), 0);

    block_on(f.runtime.dispatch(SessionAction::RemoveFile { id: f1.id }));
    assert_eq!(f.urls.revocation_count(&f1.content_url), 1);

    let Fixture { runtime, urls, .. } = f;
    drop(runtime);
    assert_eq!(urls.live_count(), 0);
    assert_eq!(urls.revocation_count(&f2.content_url), 1);
}

#[test]
fn size_sort_is_descending_with_insertion_order_ties() {
    let f = fixture(&[]);
    ingest(
        &f,
        vec![
            RawFile::from_bytes("ten", "", vec![0; 10]),
            RawFile::from_bytes("five", "", vec![0; 5]),
            RawFile::from_bytes("twenty", "", vec![0; 20]),
            RawFile::from_bytes("five-again", "", vec![0; 5]),
        ],
    );
    f.runtime.apply(SessionAction::SetSortKey(SortKey::Size));

    let order: Vec<(String, u64)> = f
        .runtime
        .snapshot()
        .visible
        .into_iter()
        .map(|e| (e.name, e.size))
        .collect();
    assert_eq!(
        order,
        vec![
            ("twenty".to_string(), 20),
            ("ten".to_string(), 10),
            ("five".to_string(), 5),
            ("five-again".to_string(), 5),
        ]
    );
}

#[test]
fn date_sort_puts_newest_first() {
    let f = fixture(&[]);
    ingest(&f, vec![RawFile::from_bytes("old", "", vec![1])]);
    f.clock.advance(60_000);
    ingest(&f, vec![RawFile::from_bytes("new", "", vec![1])]);
    f.runtime.apply(SessionAction::SetSortKey(SortKey::Date));

    let names: Vec<String> = f
        .runtime
        .snapshot()
        .visible
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["new".to_string(), "old".to_string()]);
}

#[test]
fn reopening_leaves_one_session_and_ignores_the_stale_load() {
    let f = fixture(&[]);
    ingest(
        &f,
        vec![
            RawFile::from_bytes("first.docx", "", docx(&["old"])),
            RawFile::from_bytes("second.docx", "", docx(&["new"])),
        ],
    );

    let first = f.runtime.apply(SessionAction::OpenPreview { id: FileId(1) });
    let [SessionEffect::LoadPreview(first_load)] = first.as_slice() else {
        panic!("expected a load for the first preview, got {first:?}");
    };
    block_on(f.runtime.dispatch(SessionAction::OpenPreview { id: FileId(2) }));

    block_on(f.runtime.dispatch(SessionAction::PreviewContentLoaded {
        token: first_load.token,
        outcome: Ok(file_session::PreviewPayload::DocumentHtml(
            "<p>old</p>".to_string(),
        )),
    }));

    let preview = f.runtime.snapshot().preview.expect("preview open");
    assert_eq!(preview.file.id, FileId(2));
    assert_ne!(preview.token, first_load.token);
    assert_eq!(
        preview.content,
        Some(PreviewContent::Document {
            html: "<p>new</p>".to_string()
        })
    );
}

#[test]
fn pdf_preview_pages_through_the_document() {
    let pdf = b"%PDF-1.4
2 0 obj << /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >> endobj
3 0 obj << /Type /Page /Parent 2 0 R >> endobj
4 0 obj << /Type /Page /Parent 2 0 R >> endobj
%%EOF"
        .to_vec();
    let f = fixture(&[]);
    ingest(&f, vec![RawFile::from_bytes("deck.pdf", "application/pdf", pdf)]);
    block_on(f.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));
    block_on(f.runtime.dispatch(SessionAction::NextPage));
    block_on(f.runtime.dispatch(SessionAction::NextPage));

    let preview = f.runtime.snapshot().preview.expect("preview open");
    let Some(PreviewContent::Pdf(pages)) = preview.content else {
        panic!("expected pdf content, got {:?}", preview.content);
    };
    assert_eq!((pages.current_page(), pages.total_pages()), (2, 2));
    assert_eq!(
        pages.page_url(&preview.file.content_url),
        format!("{}#page=2", preview.file.content_url)
    );
}

#[test]
fn broken_document_surfaces_a_readable_error_and_escape_closes() {
    let f = fixture(&[]);
    ingest(
        &f,
        vec![RawFile::from_bytes(
            "report.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            b"definitely not a zip".to_vec(),
        )],
    );
    assert_eq!(color_for(&f.runtime.snapshot().visible[0].mime_type), FileColor::Blue);
    block_on(f.runtime.dispatch(SessionAction::OpenPreview { id: FileId(1) }));

    let phase = f.runtime.snapshot().preview.map(|p| p.phase);
    let Some(PreviewPhase::Error(reason)) = phase else {
        panic!("expected an error phase, got {phase:?}");
    };
    assert!(reason.starts_with("could not convert document"), "{reason}");

    block_on(f.runtime.dispatch(SessionAction::KeyPressed {
        key: "Escape".to_string(),
    }));
    assert_eq!(f.runtime.snapshot().preview_state, PreviewState::Closed);
}

#[test]
fn bulk_delete_and_download_notifications_match_toast_wording() {
    let f = fixture(&[]);
    ingest(
        &f,
        vec![
            RawFile::from_bytes("a.txt", "text/plain", b"a".to_vec()),
            RawFile::from_bytes("b.txt", "text/plain", b"b".to_vec()),
            RawFile::from_bytes("c.txt", "text/plain", b"c".to_vec()),
        ],
    );
    block_on(f.runtime.dispatch(SessionAction::Download { id: FileId(3) }));
    block_on(f.runtime.dispatch(SessionAction::SelectAllVisible));
    block_on(f.runtime.dispatch(SessionAction::RemoveSelected));

    assert_eq!(
        f.notifications.messages(NotificationLevel::Info),
        vec!["3 file(s) added to upload queue".to_string()]
    );
    assert_eq!(
        f.notifications.messages(NotificationLevel::Success),
        vec![
            "c.txt downloaded successfully".to_string(),
            "3 file(s) deleted".to_string(),
        ]
    );
    assert_eq!(f.runtime.snapshot().total_files, 0);
    assert!(f.runtime.snapshot().uploads.is_empty());
}
