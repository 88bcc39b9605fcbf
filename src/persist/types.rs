//! Persisted record shapes
//!
//! Encoded with bincode, so fields are positional: append new fields at the
//! end and bump [`STATE_VERSION`].

use crate::media::{DedupKey, MediaItem, MediaKind, SourceInfo, Thumbnail};
use crate::store::MediaStore;
use serde::{Deserialize, Serialize};

/// Current record format
pub const STATE_VERSION: u32 = 1;

/// One stored entry; ids are not kept and are reissued on restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedItem {
    pub locator: String,
    pub filename: String,
    pub kind: MediaKind,
    pub info: SourceInfo,
    pub thumbnail: Option<PersistedThumbnail>,
}

/// Stored thumbnail reference; the locator is rebuilt on restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedThumbnail {
    pub filename: String,
    pub info: SourceInfo,
}

impl From<&Thumbnail> for PersistedThumbnail {
    fn from(thumb: &Thumbnail) -> Self {
        Self {
            filename: thumb.filename.clone(),
            info: thumb.info.clone(),
        }
    }
}

impl From<&MediaItem> for PersistedItem {
    fn from(item: &MediaItem) -> Self {
        Self {
            locator: item.locator.clone(),
            filename: item.filename.clone(),
            kind: item.kind,
            info: item.info.clone(),
            thumbnail: item.thumbnail.as_ref().map(PersistedThumbnail::from),
        }
    }
}

/// Everything kept for one widget instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    /// Newest first, matching collection order
    pub items: Vec<PersistedItem>,
    pub tagged: Vec<usize>,
    pub seen: Vec<DedupKey>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            items: Vec::new(),
            tagged: Vec::new(),
            seen: Vec::new(),
        }
    }
}

impl PersistedState {
    /// Snapshot a store
    #[must_use]
    pub fn capture(store: &MediaStore) -> Self {
        Self {
            version: STATE_VERSION,
            items: store.items().iter().map(PersistedItem::from).collect(),
            tagged: store.tagged().iter().copied().collect(),
            seen: store.seen_keys(),
        }
    }
}
