//! Host server boundary
//!
//! The widget consumes a handful of endpoints on the host server and defines
//! none of them. [`MediaBackend`] is the seam: [`HttpBackend`] talks to a
//! real server with `reqwest`, [`MockBackend`] records calls for tests.
//!
//! # Endpoints
//!
//! - `POST /export`, `POST /save`: `{folder, prefix, images: [...]}`
//! - `POST /set_image`, `POST /set_video`: forward the current pick downstream
//! - `GET /view?filename&subfolder&type&t`: fetch an asset
//! - `POST /upload/image`: multipart import

pub mod error;
pub mod http;
pub mod mock;

pub use error::BackendError;
pub use http::HttpBackend;
pub use mock::MockBackend;

use crate::export::{ExportRequest, ExportTarget};
use crate::media::{MediaDescriptor, SourceInfo, StorageType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which downstream output a selection is forwarded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Image,
    Video,
}

impl OutputChannel {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Image => "set_image",
            Self::Video => "set_video",
        }
    }
}

/// Body of `/set_image` and `/set_video`
///
/// An empty `filename` tells downstream nodes the selection was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSelection {
    pub instance_id: String,
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub storage_type: String,
}

impl OutputSelection {
    #[must_use]
    pub fn cleared(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            filename: String::new(),
            subfolder: String::new(),
            storage_type: String::new(),
        }
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.filename.is_empty()
    }
}

/// Response body of `/export` and `/save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResponse {
    /// Convert `{"success": false}` into an error
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` carrying the server's message.
    pub fn into_result(self) -> Result<usize, BackendError> {
        if self.success {
            Ok(self.count)
        } else {
            Err(BackendError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Operations the widget needs from the host server
pub trait MediaBackend: Send + Sync {
    /// Fetchable locator for a stored asset, with a fresh cache-busting token
    fn view_url(&self, filename: &str, info: &SourceInfo) -> String;

    /// Send a snapshot to `/export` or `/save`; returns the saved count
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-success status, or
    /// an explicit rejection.
    fn export(&self, target: ExportTarget, request: &ExportRequest) -> Result<usize, BackendError>;

    /// Forward the current pick to `/set_image` or `/set_video`
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or non-success status.
    fn set_output(&self, channel: OutputChannel, selection: &OutputSelection) -> Result<(), BackendError>;

    /// Upload a local file and return the server's descriptor for it
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the file cannot be read or the upload fails.
    fn upload(&self, path: &Path, storage_type: StorageType) -> Result<MediaDescriptor, BackendError>;

    /// Attempt to load a locator; `false` plays the role of an `onerror` callback
    fn resolves(&self, locator: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_response_rejection() {
        let body: ExportResponse = serde_json::from_str(r#"{"success": false, "error": "disk full"}"#).unwrap();
        assert!(matches!(body.into_result(), Err(BackendError::Rejected(msg)) if msg == "disk full"));

        let body: ExportResponse = serde_json::from_str(r#"{"success": true, "count": 3}"#).unwrap();
        assert_eq!(body.into_result().unwrap(), 3);
    }

    #[test]
    fn test_cleared_selection_wire_shape() {
        let json = serde_json::to_value(OutputSelection::cleared("42")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"instance_id": "42", "filename": "", "subfolder": "", "type": ""})
        );
    }
}
