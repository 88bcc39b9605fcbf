//! Export and save requests
//!
//! A request is a snapshot: filenames and subfolders are copied out of the
//! store when the request is built, so later deletes or reindexing cannot
//! change what an in-flight request refers to.

use crate::backend::MediaBackend;
use crate::media::StorageType;
use crate::notices::{Notice, NoticeLevel, NoticeSender};
use crate::store::MediaStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Which host endpoint receives the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    Export,
    Save,
}

impl ExportTarget {
    /// Endpoint path relative to the server base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Save => "save",
        }
    }

    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Export => "Exported",
            Self::Save => "Saved",
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where the indices of a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSource {
    Selected,
    Tagged,
}

/// One entry of the `images` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportImage {
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// Body of `/export` and `/save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub folder: String,
    pub prefix: String,
    pub images: Vec<ExportImage>,
}

impl ExportRequest {
    /// Copy the entries at `indices` out of the store
    ///
    /// Out-of-range indices are skipped.
    #[must_use]
    pub fn snapshot(store: &MediaStore, indices: &[usize], folder: &str, prefix: &str) -> Self {
        let images = indices
            .iter()
            .filter_map(|&i| store.get(i))
            .map(|item| ExportImage {
                filename: item.filename.clone(),
                subfolder: item.info.subfolder.clone(),
                storage_type: item.info.storage_type,
                seed: item.info.seed,
            })
            .collect();

        Self {
            folder: folder.to_string(),
            prefix: prefix.to_string(),
            images,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Pick the indices an export or save acts on
///
/// The selection wins when non-empty. Otherwise, with the tag filter on, the
/// tagged set is used. `None` means there is nothing to export.
#[must_use]
pub fn gather_targets(store: &MediaStore) -> Option<(ExportSource, Vec<usize>)> {
    if !store.selected().is_empty() {
        return Some((ExportSource::Selected, store.selected().iter().copied().collect()));
    }
    if store.tag_filter_only() && !store.tagged().is_empty() {
        return Some((ExportSource::Tagged, store.tagged().iter().copied().collect()));
    }
    None
}

/// What happened to an export or save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No targets; the endpoint was not called
    NothingToExport,
    Completed { target: ExportTarget, count: usize },
    Failed { target: ExportTarget, error: String },
}

impl ExportOutcome {
    /// Notice describing the outcome
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::NothingToExport => Notice::new(NoticeLevel::Info, "Nothing to export"),
            Self::Completed { target, count } => {
                Notice::new(NoticeLevel::Success, format!("{} {count} item(s)", target.past_tense()))
            }
            Self::Failed { target, error } => Notice::new(NoticeLevel::Error, format!("{target} failed: {error}")),
        }
    }
}

/// Send a request and fold any failure into the outcome
///
/// Failures are logged at `warn` and never returned as errors.
pub fn send(backend: &dyn MediaBackend, target: ExportTarget, request: &ExportRequest) -> ExportOutcome {
    if request.is_empty() {
        return ExportOutcome::NothingToExport;
    }
    match backend.export(target, request) {
        Ok(count) => {
            log::info!("{} {count} item(s) to {}", target.past_tense(), request.folder);
            ExportOutcome::Completed { target, count }
        }
        Err(e) => {
            log::warn!("{target} of {} item(s) failed: {e}", request.images.len());
            ExportOutcome::Failed {
                target,
                error: e.to_string(),
            }
        }
    }
}

/// Runs export requests off the caller's thread
///
/// Each dispatch spawns a worker that sends the snapshot and posts the
/// outcome as a notice. Nothing is cancelled; a delete racing an in-flight
/// request does not affect it.
#[derive(Clone)]
pub struct AutoExporter {
    backend: Arc<dyn MediaBackend>,
    notices: NoticeSender,
}

impl fmt::Debug for AutoExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoExporter").finish_non_exhaustive()
    }
}

impl AutoExporter {
    #[must_use]
    pub fn new(backend: Arc<dyn MediaBackend>, notices: NoticeSender) -> Self {
        Self { backend, notices }
    }

    /// Send `request` on a worker thread
    ///
    /// The returned handle may be dropped; tests join it to observe the call.
    pub fn dispatch(&self, target: ExportTarget, request: ExportRequest) -> JoinHandle<ExportOutcome> {
        let backend = Arc::clone(&self.backend);
        let notices = self.notices.clone();
        thread::spawn(move || {
            let outcome = send(backend.as_ref(), target, &request);
            notices.send(outcome.notice());
            outcome
        })
    }
}
