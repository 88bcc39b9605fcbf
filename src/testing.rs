//! Testing utilities for vewd
//!
//! Helpers for tests that need a state database or a widget wired to the
//! in-memory backend.
//!
//! Only available when compiled with `cfg(test)`.

use crate::backend::MockBackend;
use crate::events::ExecutionOutput;
use crate::media::{MediaDescriptor, StorageType};
use crate::persist::StateStore;
use crate::widget::ReviewWidget;
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary state database that is removed on drop
pub struct TestState {
    _dir: TempDir,
    state: Arc<StateStore>,
}

impl TestState {
    /// Create an empty database in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or database cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let state = Arc::new(StateStore::open(dir.path().join("state")).expect("open state db"));
        Self { _dir: dir, state }
    }

    /// Shared handle to the database
    pub fn handle(&self) -> Arc<StateStore> {
        Arc::clone(&self.state)
    }

    /// Build a widget for `instance_id` persisting into this database
    pub fn widget(&self, instance_id: &str, backend: &Arc<MockBackend>) -> ReviewWidget {
        ReviewWidget::builder(instance_id, backend.clone())
            .state(self.handle())
            .build()
    }
}

/// Payload listing image outputs in the default storage area
pub fn image_output(names: &[&str]) -> ExecutionOutput {
    ExecutionOutput {
        output_images: names
            .iter()
            .map(|n| MediaDescriptor::new(*n, "", StorageType::Output))
            .collect(),
        ..ExecutionOutput::default()
    }
}
