//! Media entries held by a review widget
//!
//! A media entry is one generated asset (image, video, audio clip, 3D model or
//! gaussian splat) that the host server can serve back through its `/view`
//! endpoint. Entries are identified by a synthetic [`ItemId`] because their
//! position in the collection shifts on every insert and delete.
//!
//! # Types
//!
//! - **`MediaItem`**: One entry in the collection
//! - **`MediaKind`**: What sort of asset an entry is
//! - **`SourceInfo`**: Where the server keeps the asset (subfolder, storage type, seed, camera)
//! - **`MediaDescriptor`**: The `{filename, subfolder, type}` record emitted by execution events
//! - **`DedupKey`**: `subfolder/filename` key guaranteeing at-most-once ingestion

pub mod types;

use std::path::Path;

pub use types::{
    CameraInfo, DedupKey, ItemId, MediaDescriptor, MediaItem, MediaKind, SourceInfo, StorageType,
    Thumbnail,
};

/// Image extensions recognised on import and folder scans
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Video extensions recognised on import and folder scans
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi"];

/// Audio extensions recognised on import and folder scans
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a"];

/// Mesh formats handled by the 3D viewer
pub const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf", "obj", "fbx", "stl"];

/// Gaussian splat formats
pub const SPLAT_EXTENSIONS: &[&str] = &["splat", "ksplat", "spz", "ply"];

/// Detect the media kind from a filename's extension
///
/// Extension matching is case-insensitive. Returns `None` for anything the
/// widget cannot display, which callers treat as "skip silently".
///
/// # Examples
///
/// ```
/// use vewd::media::{kind_from_filename, MediaKind};
///
/// assert_eq!(kind_from_filename("render_001.PNG"), Some(MediaKind::Image));
/// assert_eq!(kind_from_filename("clip.webm"), Some(MediaKind::Video));
/// assert_eq!(kind_from_filename("notes.txt"), None);
/// ```
#[must_use]
pub fn kind_from_filename(filename: &str) -> Option<MediaKind> {
    let (_, ext) = filename.rsplit_once('.')?;
    kind_from_extension(ext)
}

/// Detect the media kind of a local file from its extension
///
/// Only the extension has to be valid UTF-8, not the rest of the path.
#[must_use]
pub fn kind_from_path(path: &Path) -> Option<MediaKind> {
    path.extension().and_then(|ext| ext.to_str()).and_then(kind_from_extension)
}

fn kind_from_extension(ext: &str) -> Option<MediaKind> {
    let ext = ext.to_ascii_lowercase();
    let ext = ext.as_str();

    if IMAGE_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Audio)
    } else if MODEL_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Model)
    } else if SPLAT_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Splat)
    } else {
        None
    }
}
