//! Local persistence of widget state
//!
//! One record per widget instance, keyed by instance id, in a sled tree.
//! Values are bincode-encoded [`PersistedState`] records.
//!
//! Restoring does not trust stored locators: each entry is re-resolved
//! against the backend, retried once in the alternate storage area, and
//! dropped if neither resolves.

pub mod error;
pub mod types;

pub use error::PersistError;
pub use types::{PersistedItem, PersistedState, PersistedThumbnail, STATE_VERSION};

use crate::backend::MediaBackend;
use crate::media::{MediaItem, SourceInfo, Thumbnail};
use crate::store::MediaStore;
use sled::{Db, Tree};
use std::path::Path;

/// Something that can tell whether a locator still loads
pub trait ResourceProbe {
    fn resolves(&self, locator: &str) -> bool;
}

impl<F> ResourceProbe for F
where
    F: Fn(&str) -> bool,
{
    fn resolves(&self, locator: &str) -> bool {
        self(locator)
    }
}

/// Sled-backed store of per-instance state
pub struct StateStore {
    db: Db,
    instances: Tree,
}

impl StateStore {
    /// Opens or creates a state database at the specified path
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the database or its tree cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let db = sled::open(path)?;
        let instances = db.open_tree("instances")?;
        Ok(Self { db, instances })
    }

    /// Write the record for `instance_id`, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if encoding or the database write fails.
    pub fn save(&self, instance_id: &str, state: &PersistedState) -> Result<(), PersistError> {
        let value = bincode::serde::encode_to_vec(state, bincode::config::standard())?;
        self.instances.insert(instance_id.as_bytes(), value)?;
        log::debug!("Persisted {} item(s) for instance {instance_id}", state.items.len());
        Ok(())
    }

    /// Read the record for `instance_id`
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the read or decoding fails, or the record was
    /// written by a newer format.
    pub fn load(&self, instance_id: &str) -> Result<Option<PersistedState>, PersistError> {
        let Some(value) = self.instances.get(instance_id.as_bytes())? else {
            return Ok(None);
        };
        let (state, _): (PersistedState, usize) =
            bincode::serde::decode_from_slice(&value, bincode::config::standard())?;
        if state.version > STATE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: state.version,
                supported: STATE_VERSION,
            });
        }
        Ok(Some(state))
    }

    /// Delete the record for `instance_id`; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the database operation fails.
    pub fn remove(&self, instance_id: &str) -> Result<bool, PersistError> {
        Ok(self.instances.remove(instance_id.as_bytes())?.is_some())
    }

    /// Instance ids with a stored record, in key order
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if iteration fails or a key is not UTF-8.
    pub fn instances(&self) -> Result<Vec<String>, PersistError> {
        self.instances
            .iter()
            .keys()
            .map(|key| {
                let key = key?;
                String::from_utf8(key.to_vec()).map_err(|e| PersistError::InvalidKey(e.to_string()))
            })
            .collect()
    }

    /// Flush pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the flush fails.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.db.flush()?;
        Ok(())
    }
}

/// What [`restore`] did with each stored entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    /// Entries found only in the alternate storage area
    pub relocated: usize,
    /// Filenames of entries that resolved nowhere
    pub dropped: Vec<String>,
}

/// Rebuild a store from a persisted record
///
/// Every locator is rebuilt with a fresh cache-busting token and probed. A
/// failing entry is retried once in the alternate storage area; entries that
/// fail both are removed with [`MediaStore::remove_many`], so tags are
/// renumbered the same way a delete would.
pub fn restore(state: &PersistedState, backend: &dyn MediaBackend, probe: &impl ResourceProbe) -> (MediaStore, RestoreReport) {
    let items = state
        .items
        .iter()
        .map(|stored| {
            let locator = backend.view_url(&stored.filename, &stored.info);
            let thumbnail = stored.thumbnail.as_ref().map(|thumb| {
                let locator = backend.view_url(&thumb.filename, &thumb.info);
                Thumbnail::new(thumb.filename.clone(), thumb.info.clone(), locator)
            });
            MediaItem::new(stored.filename.clone(), stored.kind, locator, stored.info.clone()).with_thumbnail(thumbnail)
        })
        .collect();

    let mut store = MediaStore::from_parts(items, state.tagged.iter().copied(), state.seen.iter().cloned());
    let mut report = RestoreReport::default();
    let mut failed = Vec::new();

    for index in 0..store.len() {
        let Some(item) = store.get(index) else { continue };
        if probe.resolves(&item.locator) {
            continue;
        }

        let info = SourceInfo {
            storage_type: item.info.storage_type.alternate(),
            ..item.info.clone()
        };
        let fallback = backend.view_url(&item.filename, &info);
        if probe.resolves(&fallback) {
            log::info!("Found {} in {} storage", item.filename, info.storage_type);
            store.relocate(index, fallback, info);
            report.relocated += 1;
        } else {
            log::warn!("Dropping {}: no longer available", item.filename);
            report.dropped.push(item.filename.clone());
            failed.push(index);
        }
    }

    store.remove_many(&failed);

    report.restored = store.len();
    (store, report)
}
