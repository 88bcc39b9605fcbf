//! Media entry data types
//!
//! These are plain data structures. Index bookkeeping lives in
//! [`crate::store::MediaStore`]; nothing here knows its own position.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Stable synthetic identity of a media entry
///
/// Ids are unique for the lifetime of the process. They are not persisted;
/// restored entries receive fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Allocate a fresh id
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of asset an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Model,
    Splat,
}

impl MediaKind {
    /// Whether the kind is rendered by the 3D viewer
    #[must_use]
    pub const fn is_three_d(self) -> bool {
        matches!(self, Self::Model | Self::Splat)
    }

    /// Lowercase name used in views and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Model => "model",
            Self::Splat => "splat",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side storage area an asset lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Output,
    Temp,
    Input,
}

impl StorageType {
    /// Storage area to retry when a locator in this area no longer resolves
    ///
    /// Preview renders move between `temp` and `output` depending on the node
    /// that produced them, so each falls back to the other.
    #[must_use]
    pub const fn alternate(self) -> Self {
        match self {
            Self::Output => Self::Temp,
            Self::Temp | Self::Input => Self::Output,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Temp => "temp",
            Self::Input => "input",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "output" => Ok(Self::Output),
            "temp" => Ok(Self::Temp),
            "input" => Ok(Self::Input),
            other => Err(format!("unknown storage type '{other}'")),
        }
    }
}

/// Camera intrinsics/extrinsics attached to 3D outputs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Row-major 4x4 camera-to-world matrix
    #[serde(default)]
    pub extrinsics: Vec<f32>,
    /// Row-major 3x3 intrinsics matrix
    #[serde(default)]
    pub intrinsics: Vec<f32>,
}

/// Where the server keeps an asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    pub subfolder: String,
    pub storage_type: StorageType,
    pub seed: Option<i64>,
    pub camera: Option<CameraInfo>,
}

/// De-duplication key: `subfolder/filename`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DedupKey(String);

impl DedupKey {
    #[must_use]
    pub fn new(filename: &str, subfolder: &str) -> Self {
        Self(format!("{subfolder}/{filename}"))
    }

    /// Rebuild a key from its stored string form
    #[must_use]
    pub const fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stand-in preview image for kinds without a native thumbnail
///
/// Keeps the asset reference next to the locator so the locator can be
/// rebuilt against another server or with a fresh cache-busting token.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub filename: String,
    pub info: SourceInfo,
    pub locator: String,
}

impl Thumbnail {
    #[must_use]
    pub fn new(filename: impl Into<String>, info: SourceInfo, locator: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            info,
            locator: locator.into(),
        }
    }
}

/// One asset in the review collection
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub id: ItemId,
    pub filename: String,
    pub kind: MediaKind,
    /// Fetchable resource locator; may carry a cache-busting token
    pub locator: String,
    pub info: SourceInfo,
    pub thumbnail: Option<Thumbnail>,
}

impl MediaItem {
    /// Create an entry with a fresh id
    #[must_use]
    pub fn new(filename: impl Into<String>, kind: MediaKind, locator: impl Into<String>, info: SourceInfo) -> Self {
        Self {
            id: ItemId::fresh(),
            filename: filename.into(),
            kind,
            locator: locator.into(),
            info,
            thumbnail: None,
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<Thumbnail>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.filename, &self.info.subfolder)
    }

    /// Source the grid tile should display
    #[must_use]
    pub fn preview_source(&self) -> &str {
        self.thumbnail.as_ref().map_or(&self.locator, |thumb| &thumb.locator)
    }
}

/// Asset reference as emitted by the host's execution events and upload endpoint
///
/// Wire shape: `{"filename": ..., "subfolder": ..., "type": ...}` with optional
/// `seed`, `camera` and `thumbnail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default)]
    pub storage_type: StorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Box<MediaDescriptor>>,
}

impl MediaDescriptor {
    #[must_use]
    pub fn new(filename: impl Into<String>, subfolder: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            filename: filename.into(),
            subfolder: subfolder.into(),
            storage_type,
            seed: None,
            camera: None,
            thumbnail: None,
        }
    }

    #[must_use]
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.filename, &self.subfolder)
    }

    #[must_use]
    pub fn source_info(&self) -> SourceInfo {
        SourceInfo {
            subfolder: self.subfolder.clone(),
            storage_type: self.storage_type,
            seed: self.seed,
            camera: self.camera.clone(),
        }
    }
}
