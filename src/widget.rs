//! The review widget: store, controller, backend and persistence wired together
//!
//! [`ReviewWidget`] is what the host integration holds per node instance.
//! Input goes through [`ReviewWidget::handle_event`]; the widget applies it
//! via the controller, then takes care of the side effects: persisting,
//! auto-export, forwarding the current pick downstream, and notices.
//!
//! Network calls run on worker threads and report back through the notice
//! board, so input handling never waits on the server. Pick forwarding goes
//! through a single ordered worker ([`OutputForwarder`]).

use crate::VewdError;
use crate::backend::{MediaBackend, OutputChannel, OutputSelection};
use crate::forward::{OutputForwarder, Pick};
use crate::config::WidgetConfig;
use crate::controller::{ControllerEffect, EventResponse, InputEvent, SelectionController};
use crate::events::ExecutionOutput;
use crate::export::{AutoExporter, ExportOutcome, ExportRequest, ExportTarget, gather_targets};
use crate::media::{MediaDescriptor, MediaItem, MediaKind, StorageType, Thumbnail, kind_from_path};
use crate::notices::{NoticeBoard, NoticeLevel};
use crate::persist::{PersistedState, StateStore, restore};
use crate::store::{MediaStore, RemovalOutcome, TypeFilter};
use crate::view::{ViewFlags, WidgetView, render};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::SystemTime;

/// Result of importing a batch of local files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// Uploaded, but the server's name was already in the collection
    pub duplicates: usize,
    /// Unrecognized extension or repeated path
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Builder for [`ReviewWidget`]
pub struct WidgetBuilder {
    instance_id: String,
    backend: Arc<dyn MediaBackend>,
    config: WidgetConfig,
    state: Option<Arc<StateStore>>,
}

impl WidgetBuilder {
    #[must_use]
    pub fn config(mut self, config: &WidgetConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Persist to and restore from this database
    #[must_use]
    pub fn state(mut self, state: Arc<StateStore>) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the widget, restoring any persisted state for its instance id
    ///
    /// Restore failures are logged and reported as notices; the widget then
    /// starts empty.
    #[must_use]
    pub fn build(self) -> ReviewWidget {
        let notices = NoticeBoard::with_ttl(self.config.notice_ttl());
        let exporter = AutoExporter::new(Arc::clone(&self.backend), notices.sender());
        let forwarder = OutputForwarder::spawn(Arc::clone(&self.backend), notices.sender());

        let mut widget = ReviewWidget {
            controller: SelectionController::new(&self.config.keybinds, self.config.grid()),
            store: MediaStore::new(),
            instance_id: self.instance_id,
            backend: self.backend,
            exporter,
            forwarder,
            state: self.state,
            notices,
            export_folder: self.config.export_folder,
            filename_prefix: self.config.filename_prefix,
            upload_storage: self.config.upload_storage,
            auto_export: self.config.auto_export,
            exports: Vec::new(),
        };
        widget.restore();
        widget
    }
}

/// One media review widget instance
pub struct ReviewWidget {
    instance_id: String,
    store: MediaStore,
    controller: SelectionController,
    backend: Arc<dyn MediaBackend>,
    exporter: AutoExporter,
    forwarder: OutputForwarder,
    state: Option<Arc<StateStore>>,
    notices: NoticeBoard,
    export_folder: String,
    filename_prefix: String,
    upload_storage: StorageType,
    auto_export: bool,
    exports: Vec<JoinHandle<ExportOutcome>>,
}

impl fmt::Debug for ReviewWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewWidget")
            .field("instance_id", &self.instance_id)
            .field("items", &self.store.len())
            .field("auto_export", &self.auto_export)
            .finish_non_exhaustive()
    }
}

impl ReviewWidget {
    /// Start building a widget for `instance_id`
    #[must_use]
    pub fn builder(instance_id: impl Into<String>, backend: Arc<dyn MediaBackend>) -> WidgetBuilder {
        WidgetBuilder {
            instance_id: instance_id.into(),
            backend,
            config: WidgetConfig::default(),
            state: None,
        }
    }

    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    #[must_use]
    pub const fn store(&self) -> &MediaStore {
        &self.store
    }

    #[must_use]
    pub const fn controller(&self) -> &SelectionController {
        &self.controller
    }

    #[must_use]
    pub const fn auto_export(&self) -> bool {
        self.auto_export
    }

    #[must_use]
    pub const fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Ingest every descriptor of an execution payload
    ///
    /// Returns the number of new entries; already-seen assets are skipped.
    pub fn ingest_output(&mut self, output: &ExecutionOutput) -> usize {
        let added = output
            .descriptors()
            .into_iter()
            .filter(|(kind, descriptor)| self.ingest(*kind, descriptor))
            .count();

        if added > 0 {
            log::info!("Instance {}: {added} new item(s)", self.instance_id);
            self.after_change();
        }
        added
    }

    /// Ingest one descriptor; returns `false` if its asset was already seen
    ///
    /// Does not persist; callers batching several ingests persist once.
    pub fn ingest(&mut self, kind: MediaKind, descriptor: &MediaDescriptor) -> bool {
        if self.store.has_seen(&descriptor.dedup_key()) {
            log::debug!("Skipping already seen {}", descriptor.dedup_key().as_str());
            return false;
        }

        let info = descriptor.source_info();
        let locator = self.backend.view_url(&descriptor.filename, &info);
        let thumbnail = descriptor.thumbnail.as_ref().map(|thumb| {
            let info = thumb.source_info();
            let locator = self.backend.view_url(&thumb.filename, &info);
            Thumbnail::new(thumb.filename.clone(), info, locator)
        });

        let item = MediaItem::new(descriptor.filename.clone(), kind, locator, info).with_thumbnail(thumbnail);
        self.store.admit(item)
    }

    /// Upload local files one at a time and add them to the collection
    ///
    /// Files with unrecognized extensions are skipped without error, and a
    /// path listed more than once is uploaded once.
    pub fn import_files(&mut self, paths: &[PathBuf]) -> ImportReport {
        let mut report = ImportReport::default();
        let mut seen_paths = HashSet::new();

        for path in paths {
            let Some(kind) = kind_from_path(path) else {
                log::debug!("Skipping {}: unrecognized extension", path.display());
                report.skipped += 1;
                continue;
            };
            let physical = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !seen_paths.insert(physical) {
                report.skipped += 1;
                continue;
            }

            match self.backend.upload(path, self.upload_storage) {
                Ok(descriptor) => {
                    if self.ingest(kind, &descriptor) {
                        report.imported += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(e) => {
                    log::warn!("Upload of {} failed: {e}", path.display());
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        if !report.failed.is_empty() {
            self.notices.push(
                NoticeLevel::Warning,
                format!("{} file(s) failed to upload", report.failed.len()),
            );
        }
        if report.imported > 0 {
            self.after_change();
        }
        report
    }

    /// Import every media file directly inside `dir`, oldest first
    ///
    /// Oldest-first import leaves the most recently modified file at index 0.
    ///
    /// # Errors
    ///
    /// Returns `VewdError::InvalidInput` if `dir` is not a directory.
    pub fn scan_folder(&mut self, dir: &Path) -> Result<ImportReport, VewdError> {
        if !dir.is_dir() {
            return Err(VewdError::InvalidInput(format!("{} is not a directory", dir.display())));
        }

        let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
        let entries = glob::glob(&pattern).map_err(|e| VewdError::InvalidInput(e.to_string()))?;

        let mut files: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Cannot read {}: {e}", e.path().display());
                    None
                }
            })
            .filter(|path| path.is_file() && kind_from_path(path).is_some())
            .filter_map(|path| {
                let modified = path.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, path))
            })
            .collect();
        files.sort();

        let paths: Vec<PathBuf> = files.into_iter().map(|(_, path)| path).collect();
        log::info!("Scanning {}: {} media file(s)", dir.display(), paths.len());
        Ok(self.import_files(&paths))
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Apply one input event and run its side effects
    pub fn handle_event(&mut self, event: InputEvent) -> EventResponse {
        let response = self.controller.handle(&mut self.store, event);

        let mut persist = false;
        let mut forward = false;
        for effect in &response.effects {
            match effect {
                ControllerEffect::SelectionChanged => forward = true,
                ControllerEffect::TagsChanged { tagged } => {
                    persist = true;
                    if self.auto_export && *tagged > 0 {
                        self.export_tagged(ExportTarget::Export);
                    }
                }
                ControllerEffect::Removed(outcome) => {
                    persist = true;
                    forward = true;
                    if let RemovalOutcome::HiddenRemain { hidden, .. } = outcome {
                        self.notices.push(
                            NoticeLevel::Info,
                            format!("{hidden} hidden item(s) remain; change the filter to see them"),
                        );
                    }
                }
                ControllerEffect::SaveTaggedRequested => {
                    self.save_tagged();
                }
                ControllerEffect::FilterChanged
                | ControllerEffect::PaneActivated(_)
                | ControllerEffect::DisplayModeChanged(_)
                | ControllerEffect::ScrolledTo { .. } => {}
            }
        }

        if persist {
            self.persist();
        }
        if forward {
            self.forward_selection();
        }
        response
    }

    // ------------------------------------------------------------------
    // Toolbar
    // ------------------------------------------------------------------

    /// Export or save the current targets in the background
    ///
    /// Returns `false`, with a "Nothing to export" notice, when there is no
    /// selection and no tagged set in view.
    pub fn export(&mut self, target: ExportTarget) -> bool {
        let Some((source, indices)) = gather_targets(&self.store) else {
            self.notices.push(NoticeLevel::Info, "Nothing to export");
            return false;
        };
        log::debug!("{target} {} item(s) from {source:?}", indices.len());
        self.dispatch(target, &indices);
        true
    }

    /// Save the tagged set, regardless of selection
    pub fn save_tagged(&mut self) -> bool {
        if self.store.tagged().is_empty() {
            self.notices.push(NoticeLevel::Info, "No tagged images");
            return false;
        }
        self.export_tagged(ExportTarget::Save);
        true
    }

    pub fn set_type_filter(&mut self, filter: TypeFilter) {
        self.store.set_type_filter(filter);
    }

    pub fn set_tag_filter_only(&mut self, on: bool) {
        self.store.set_tag_filter_only(on);
    }

    pub fn toggle_tag_filter(&mut self) {
        let on = !self.store.tag_filter_only();
        self.store.set_tag_filter_only(on);
    }

    pub const fn set_auto_export(&mut self, on: bool) {
        self.auto_export = on;
    }

    /// Drop every entry and forget every seen asset
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.controller.reset();
        self.after_change();
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    #[must_use]
    pub fn render(&self) -> WidgetView {
        let flags = ViewFlags {
            auto_export: self.auto_export,
            notice: self.notices.latest().cloned(),
        };
        render(&self.store, &self.controller.layout(), &flags)
    }

    /// Collect notices from background work and drop expired ones
    pub fn poll_notices(&mut self) {
        self.prune_exports();
        self.notices.poll();
    }

    /// Wait for every in-flight request
    ///
    /// Returns, in dispatch order, the outcomes of exports that had not been
    /// pruned as finished by an earlier dispatch or poll.
    pub fn wait_idle(&mut self) -> Vec<ExportOutcome> {
        self.forwarder.flush();
        let outcomes = self
            .exports
            .drain(..)
            .filter_map(|handle| match handle.join() {
                Ok(outcome) => Some(outcome),
                Err(_) => {
                    log::error!("Export worker panicked");
                    None
                }
            })
            .collect();
        self.notices.poll();
        outcomes
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write current state to the state database, if one is attached
    ///
    /// Failures are logged and reported as a notice.
    pub fn persist(&mut self) {
        let Some(state) = &self.state else { return };
        if let Err(e) = state.save(&self.instance_id, &PersistedState::capture(&self.store)) {
            log::warn!("Failed to persist instance {}: {e}", self.instance_id);
            self.notices.push(NoticeLevel::Error, format!("Could not save state: {e}"));
        }
    }

    fn restore(&mut self) {
        let Some(state) = &self.state else { return };
        let record = match state.load(&self.instance_id) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to load state for instance {}: {e}", self.instance_id);
                self.notices.push(NoticeLevel::Error, format!("Could not restore state: {e}"));
                return;
            }
        };

        let backend = Arc::clone(&self.backend);
        let (store, report) = restore(&record, backend.as_ref(), &|url: &str| backend.resolves(url));
        self.store = store;
        log::info!(
            "Instance {}: restored {} item(s), {} relocated, {} dropped",
            self.instance_id,
            report.restored,
            report.relocated,
            report.dropped.len()
        );

        if !report.dropped.is_empty() {
            self.notices.push(
                NoticeLevel::Warning,
                format!("{} item(s) no longer available", report.dropped.len()),
            );
        }
        if report.relocated > 0 || !report.dropped.is_empty() {
            self.persist();
        }
    }

    // ------------------------------------------------------------------
    // Side effects
    // ------------------------------------------------------------------

    fn after_change(&mut self) {
        self.persist();
        self.forward_selection();
    }

    fn export_tagged(&mut self, target: ExportTarget) {
        let indices: Vec<usize> = self.store.tagged().iter().copied().collect();
        self.dispatch(target, &indices);
    }

    fn dispatch(&mut self, target: ExportTarget, indices: &[usize]) {
        let request = ExportRequest::snapshot(&self.store, indices, &self.export_folder, &self.filename_prefix);
        self.prune_exports();
        self.exports.push(self.exporter.dispatch(target, request));
    }

    /// Drop handles of finished exports; their notices are already posted
    fn prune_exports(&mut self) {
        self.exports.retain(|handle| !handle.is_finished());
    }

    /// What downstream nodes should currently see, if it is expressible
    fn current_pick(&self) -> Option<Pick> {
        let mut selected = self.store.selected().iter();
        let Some(&index) = selected.next() else {
            return Some((OutputChannel::Image, OutputSelection::cleared(&self.instance_id)));
        };
        if selected.next().is_some() {
            return None;
        }

        let item = self.store.get(index)?;
        let channel = match item.kind {
            MediaKind::Image => OutputChannel::Image,
            MediaKind::Video => OutputChannel::Video,
            MediaKind::Audio | MediaKind::Model | MediaKind::Splat => return None,
        };
        Some((
            channel,
            OutputSelection {
                instance_id: self.instance_id.clone(),
                filename: item.filename.clone(),
                subfolder: item.info.subfolder.clone(),
                storage_type: item.info.storage_type.as_str().to_string(),
            },
        ))
    }

    fn forward_selection(&self) {
        if let Some(pick) = self.current_pick() {
            self.forwarder.forward(pick);
        }
    }
}

#[cfg(test)]
#[path = "widget_tests.rs"]
mod widget_tests;
