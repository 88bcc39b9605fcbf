//! In-memory backend for testing

use super::{BackendError, MediaBackend, OutputChannel, OutputSelection};
use crate::export::{ExportRequest, ExportTarget};
use crate::media::{MediaDescriptor, SourceInfo, StorageType};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Backend that records every call instead of talking to a server
///
/// Locators look like `mock://<type>/<subfolder>/<filename>?v=<n>`, where
/// `n` increases on every call so re-resolved locators differ.
#[derive(Debug, Default)]
pub struct MockBackend {
    exports: Mutex<Vec<(ExportTarget, ExportRequest)>>,
    outputs: Mutex<Vec<(OutputChannel, OutputSelection)>>,
    uploads: Mutex<Vec<PathBuf>>,
    missing: Mutex<HashSet<String>>,
    fail_exports: AtomicBool,
    fail_outputs: AtomicBool,
    generation: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn base_locator(filename: &str, subfolder: &str, storage_type: StorageType) -> String {
    format!("mock://{storage_type}/{subfolder}/{filename}")
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every export and save fail with a rejection
    pub fn fail_exports(&self, fail: bool) {
        self.fail_exports.store(fail, Ordering::SeqCst);
    }

    /// Make every `/set_image` and `/set_video` call fail
    pub fn fail_outputs(&self, fail: bool) {
        self.fail_outputs.store(fail, Ordering::SeqCst);
    }

    /// Make locators for this asset stop resolving
    pub fn mark_missing(&self, filename: &str, subfolder: &str, storage_type: StorageType) {
        lock(&self.missing).insert(base_locator(filename, subfolder, storage_type));
    }

    /// Export and save calls received so far
    #[must_use]
    pub fn exports(&self) -> Vec<(ExportTarget, ExportRequest)> {
        lock(&self.exports).clone()
    }

    /// Output forwarding calls received so far
    #[must_use]
    pub fn outputs(&self) -> Vec<(OutputChannel, OutputSelection)> {
        lock(&self.outputs).clone()
    }

    /// Paths uploaded so far
    #[must_use]
    pub fn uploads(&self) -> Vec<PathBuf> {
        lock(&self.uploads).clone()
    }
}

impl MediaBackend for MockBackend {
    fn view_url(&self, filename: &str, info: &SourceInfo) -> String {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        format!(
            "{}?v={generation}",
            base_locator(filename, &info.subfolder, info.storage_type)
        )
    }

    fn export(&self, target: ExportTarget, request: &ExportRequest) -> Result<usize, BackendError> {
        lock(&self.exports).push((target, request.clone()));
        if self.fail_exports.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected("mock failure".to_string()));
        }
        Ok(request.images.len())
    }

    fn set_output(&self, channel: OutputChannel, selection: &OutputSelection) -> Result<(), BackendError> {
        lock(&self.outputs).push((channel, selection.clone()));
        if self.fail_outputs.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                path: channel.path().to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    fn upload(&self, path: &Path, storage_type: StorageType) -> Result<MediaDescriptor, BackendError> {
        std::fs::metadata(path)?;
        lock(&self.uploads).push(path.to_path_buf());

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(MediaDescriptor::new(filename, "", storage_type))
    }

    fn resolves(&self, locator: &str) -> bool {
        let base = locator.split('?').next().unwrap_or(locator);
        !lock(&self.missing).contains(base)
    }
}
