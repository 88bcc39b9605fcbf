use super::*;
use crate::backend::{BackendError, MockBackend};
use crate::controller::{Key, Modifiers};
use crate::export::ExportOutcome;
use crate::media::SourceInfo;
use crate::testing::{TestState, image_output};
use std::fs::{self, File};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Backend whose first output post is slow
#[derive(Default)]
struct SlowFirstOutput {
    inner: MockBackend,
    calls: AtomicUsize,
}

impl MediaBackend for SlowFirstOutput {
    fn view_url(&self, filename: &str, info: &SourceInfo) -> String {
        self.inner.view_url(filename, info)
    }

    fn export(&self, target: ExportTarget, request: &ExportRequest) -> Result<usize, BackendError> {
        self.inner.export(target, request)
    }

    fn set_output(&self, channel: OutputChannel, selection: &OutputSelection) -> Result<(), BackendError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::thread::sleep(Duration::from_millis(200));
        }
        self.inner.set_output(channel, selection)
    }

    fn upload(&self, path: &Path, storage_type: StorageType) -> Result<MediaDescriptor, BackendError> {
        self.inner.upload(path, storage_type)
    }

    fn resolves(&self, locator: &str) -> bool {
        self.inner.resolves(locator)
    }
}

fn images(names: &[&str]) -> ExecutionOutput {
    image_output(names)
}

fn widget() -> (Arc<MockBackend>, ReviewWidget) {
    let backend = Arc::new(MockBackend::new());
    let widget = ReviewWidget::builder("node-1", backend.clone()).build();
    (backend, widget)
}

fn names(widget: &ReviewWidget) -> Vec<String> {
    widget.store().items().iter().map(|i| i.filename.clone()).collect()
}

fn key(key: Key) -> InputEvent {
    InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
}

fn click(index: usize) -> InputEvent {
    InputEvent::TileClick { index, modifiers: Modifiers::NONE }
}

fn latest_notice(widget: &ReviewWidget) -> Option<String> {
    widget.notices().latest().map(|n| n.text.clone())
}

#[test]
fn test_ingest_prepends_and_dedups() {
    let (_, mut widget) = widget();

    assert_eq!(widget.ingest_output(&images(&["a.png", "b.png", "c.png"])), 3);
    assert_eq!(names(&widget), ["c.png", "b.png", "a.png"]);
    assert_eq!(widget.store().focus(), Some(2));

    assert_eq!(widget.ingest_output(&images(&["b.png", "d.png"])), 1);
    assert_eq!(names(&widget), ["d.png", "c.png", "b.png", "a.png"]);
}

#[test]
fn test_thumbnail_is_resolved() {
    let (_, mut widget) = widget();
    let mut model = MediaDescriptor::new("mesh.glb", "3d", StorageType::Output);
    model.thumbnail = Some(Box::new(MediaDescriptor::new("mesh.png", "3d", StorageType::Temp)));

    assert!(widget.ingest(MediaKind::Model, &model));

    let item = &widget.store().items()[0];
    assert!(item.locator.starts_with("mock://output/3d/mesh.glb"));
    assert!(item.preview_source().starts_with("mock://temp/3d/mesh.png"));
}

#[test]
fn test_selection_forwarded_downstream() {
    let (backend, mut widget) = widget();
    widget.ingest_output(&images(&["a.png", "b.png"]));
    widget.handle_event(click(0));
    widget.wait_idle();

    let outputs = backend.outputs();
    let (channel, last) = outputs.last().unwrap();
    assert_eq!(*channel, OutputChannel::Image);
    assert_eq!(last.filename, "b.png");
    assert_eq!(last.instance_id, "node-1");

    // Same pick again is not re-sent
    let sent = outputs.len();
    widget.handle_event(click(0));
    widget.wait_idle();
    assert_eq!(backend.outputs().len(), sent);
}

#[test]
fn test_forwarded_picks_arrive_in_order() {
    let backend = Arc::new(SlowFirstOutput::default());
    let mut widget = ReviewWidget::builder("node-1", backend.clone()).build();

    // [c, b, a] with a picked; its post is the slow one
    widget.ingest_output(&images(&["a.png", "b.png", "c.png"]));
    widget.handle_event(click(1));
    widget.handle_event(click(0));
    widget.wait_idle();

    let sent: Vec<String> = backend.inner.outputs().into_iter().map(|(_, s)| s.filename).collect();
    assert_eq!(sent, ["a.png", "b.png", "c.png"]);
}

#[test]
fn test_failed_forward_is_retried_on_next_pick() {
    let (backend, mut widget) = widget();
    widget.ingest_output(&images(&["a.png", "b.png"]));
    widget.wait_idle();

    backend.fail_outputs(true);
    widget.handle_event(click(0));
    widget.wait_idle();
    assert!(latest_notice(&widget).unwrap().starts_with("Could not update output"));

    backend.fail_outputs(false);
    widget.handle_event(click(0));
    widget.wait_idle();

    let sent: Vec<String> = backend.outputs().into_iter().map(|(_, s)| s.filename).collect();
    assert_eq!(sent, ["a.png", "b.png", "b.png"]);
}

#[test]
fn test_multi_selection_not_forwarded_and_clear_is() {
    let (backend, mut widget) = widget();
    widget.ingest_output(&images(&["a.png", "b.png"]));
    widget.wait_idle();
    let sent = backend.outputs().len();

    widget.handle_event(InputEvent::TileClick { index: 0, modifiers: Modifiers::shift() });
    widget.wait_idle();
    assert_eq!(backend.outputs().len(), sent);

    widget.handle_event(key(Key::Delete));
    widget.wait_idle();
    let outputs = backend.outputs();
    assert!(outputs.last().unwrap().1.is_clear());
}

#[test]
fn test_auto_export_on_tag() {
    let (backend, mut widget) = widget();
    widget.set_auto_export(true);
    widget.ingest_output(&images(&["a.png", "b.png"]));

    widget.handle_event(key(Key::Space));
    let outcomes = widget.wait_idle();

    assert_eq!(outcomes, [ExportOutcome::Completed { target: ExportTarget::Export, count: 1 }]);
    let exports = backend.exports();
    assert_eq!(exports[0].1.images[0].filename, "a.png");
    assert_eq!(exports[0].1.folder, "vewd");

    // Untagging the last tagged entry does not export
    widget.handle_event(key(Key::Space));
    assert!(widget.wait_idle().is_empty());
    assert_eq!(backend.exports().len(), 1);
}

#[test]
fn test_auto_export_failure_is_a_notice() {
    let (backend, mut widget) = widget();
    backend.fail_exports(true);
    widget.set_auto_export(true);
    widget.ingest_output(&images(&["a.png"]));

    let response = widget.handle_event(key(Key::Space));
    assert!(response.consumed);
    widget.wait_idle();

    assert_eq!(widget.store().tagged().len(), 1);
    assert!(latest_notice(&widget).unwrap().contains("mock failure"));
}

#[test]
fn test_export_nothing_to_export() {
    let (backend, mut widget) = widget();
    assert!(!widget.export(ExportTarget::Export));
    assert_eq!(latest_notice(&widget).as_deref(), Some("Nothing to export"));
    assert!(backend.exports().is_empty());
}

#[test]
fn test_finished_exports_are_pruned_on_dispatch() {
    let (_, mut widget) = widget();
    widget.ingest_output(&images(&["a.png"]));

    for _ in 0..3 {
        assert!(widget.export(ExportTarget::Export));
        while widget.exports.iter().any(|handle| !handle.is_finished()) {
            std::thread::yield_now();
        }
    }

    assert_eq!(widget.exports.len(), 1);
}

#[test]
fn test_export_selection_snapshot() {
    let (backend, mut widget) = widget();
    widget.ingest_output(&images(&["a.png", "b.png", "c.png"]));
    widget.handle_event(click(0));
    widget.handle_event(InputEvent::TileClick { index: 2, modifiers: Modifiers::ctrl() });

    assert!(widget.export(ExportTarget::Save));
    // Deleting right after dispatch does not change the request
    widget.handle_event(key(Key::Delete));
    widget.wait_idle();

    let (target, request) = &backend.exports()[0];
    assert_eq!(*target, ExportTarget::Save);
    let sent: Vec<&str> = request.images.iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(sent, ["c.png", "a.png"]);
    assert_eq!(names(&widget), ["b.png"]);
    assert_eq!(latest_notice(&widget).as_deref(), Some("Saved 2 item(s)"));
}

#[test]
fn test_save_tagged_key() {
    let (backend, mut widget) = widget();
    widget.ingest_output(&images(&["a.png", "b.png"]));

    widget.handle_event(key(Key::Char('s')));
    assert_eq!(latest_notice(&widget).as_deref(), Some("No tagged images"));
    assert!(widget.wait_idle().is_empty());

    widget.handle_event(click(0));
    widget.handle_event(key(Key::Space));
    widget.handle_event(click(1));
    widget.handle_event(key(Key::Char('s')));
    widget.wait_idle();

    let exports = backend.exports();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].0, ExportTarget::Save);
    assert_eq!(exports[0].1.images[0].filename, "b.png");
}

#[test]
fn test_delete_with_only_hidden_left_notifies() {
    let (_, mut widget) = widget();
    widget.ingest_output(&ExecutionOutput {
        output_images: vec![
            MediaDescriptor::new("a.png", "", StorageType::Output),
            MediaDescriptor::new("b.png", "", StorageType::Output),
        ],
        output_videos: vec![MediaDescriptor::new("v.mp4", "", StorageType::Output)],
        ..ExecutionOutput::default()
    });
    widget.set_type_filter(TypeFilter::Video);
    widget.handle_event(click(0));
    widget.handle_event(key(Key::Delete));

    assert_eq!(widget.store().len(), 2);
    assert_eq!(widget.store().focus(), None);
    assert!(latest_notice(&widget).unwrap().starts_with("2 hidden item(s) remain"));
}

#[test]
fn test_toolbar_toggles() {
    let (_, mut widget) = widget();
    widget.toggle_tag_filter();
    assert!(widget.render().toolbar.tag_filter_active);
    widget.set_tag_filter_only(false);
    assert!(!widget.render().toolbar.tag_filter_active);

    widget.set_auto_export(true);
    assert!(widget.render().toolbar.auto_export);
}

#[test]
fn test_clear_all_forgets_seen() {
    let (_, mut widget) = widget();
    widget.ingest_output(&images(&["a.png"]));
    widget.clear_all();

    assert!(widget.store().is_empty());
    assert!(!widget.render().toolbar.clear_enabled);
    assert_eq!(widget.ingest_output(&images(&["a.png"])), 1);
}

#[test]
fn test_state_survives_rebuild() {
    let state = TestState::new();
    let backend = Arc::new(MockBackend::new());

    {
        let mut widget = state.widget("node-9", &backend);
        widget.ingest_output(&images(&["a.png", "b.png", "c.png"]));
        widget.handle_event(click(1));
        widget.handle_event(key(Key::Space));
        widget.wait_idle();
    }

    let mut widget = state.widget("node-9", &backend);
    assert_eq!(names(&widget), ["c.png", "b.png", "a.png"]);
    assert_eq!(widget.store().tagged().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(widget.ingest_output(&images(&["a.png"])), 0);
}

#[test]
fn test_restored_widget_exports_tagged_set_under_tag_filter() {
    let state = TestState::new();
    let backend = Arc::new(MockBackend::new());

    {
        let mut widget = state.widget("n", &backend);
        widget.ingest_output(&images(&["a.png", "b.png", "c.png"]));
        widget.handle_event(click(2));
        widget.handle_event(key(Key::Space));
        widget.wait_idle();
    }

    let mut widget = state.widget("n", &backend);
    assert!(widget.store().selected().is_empty());
    widget.set_tag_filter_only(true);
    assert!(widget.export(ExportTarget::Export));
    widget.wait_idle();

    let exports = backend.exports();
    let sent: Vec<&str> = exports[0].1.images.iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(sent, ["a.png"]);
}

#[test]
fn test_restore_drops_missing_entries() {
    let state = TestState::new();
    let backend = Arc::new(MockBackend::new());

    {
        let mut widget = state.widget("n", &backend);
        widget.ingest_output(&images(&["a.png", "b.png"]));
    }
    backend.mark_missing("a.png", "", StorageType::Output);
    backend.mark_missing("a.png", "", StorageType::Temp);

    let widget = state.widget("n", &backend);
    assert_eq!(names(&widget), ["b.png"]);
    assert_eq!(latest_notice(&widget).as_deref(), Some("1 item(s) no longer available"));
    assert_eq!(state.handle().load("n").unwrap().unwrap().items.len(), 1);
}

#[test]
fn test_import_files() {
    let dir = TempDir::new().unwrap();
    let png = dir.path().join("shot.png");
    let txt = dir.path().join("notes.txt");
    File::create(&png).unwrap();
    File::create(&txt).unwrap();
    let (backend, mut widget) = widget();

    let report = widget.import_files(&[png.clone(), txt, png.clone(), dir.path().join("gone.png")]);

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(backend.uploads(), vec![png]);
    assert_eq!(names(&widget), ["shot.png"]);
    assert_eq!(widget.store().items()[0].info.storage_type, StorageType::Input);
    assert_eq!(latest_notice(&widget).as_deref(), Some("1 file(s) failed to upload"));
}

#[test]
fn test_scan_folder_oldest_first() {
    let dir = TempDir::new().unwrap();
    let base = SystemTime::now() - Duration::from_secs(600);
    for (name, age) in [("new.png", 0), ("old.jpg", 300), ("mid.webp", 100)] {
        let file = File::create(dir.path().join(name)).unwrap();
        file.set_modified(base - Duration::from_secs(age)).unwrap();
    }
    fs::write(dir.path().join("readme.md"), "x").unwrap();
    fs::create_dir(dir.path().join("sub.png")).unwrap();
    let (_, mut widget) = widget();

    let report = widget.scan_folder(dir.path()).unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(names(&widget), ["new.png", "mid.webp", "old.jpg"]);
}

#[cfg(unix)]
#[test]
fn test_import_classifies_non_utf8_paths_by_extension() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join(OsStr::from_bytes(b"r\xffnder.png"));
    if File::create(&path).is_err() {
        // Filesystem refuses non-UTF-8 names
        return;
    }
    let (backend, mut widget) = widget();

    let report = widget.import_files(&[path.clone()]);

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(backend.uploads(), vec![path]);
}

#[test]
fn test_scan_folder_rejects_files() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.png");
    File::create(&file).unwrap();
    let (_, mut widget) = widget();

    assert!(matches!(widget.scan_folder(&file), Err(VewdError::InvalidInput(_))));
}
