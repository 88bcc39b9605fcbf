//! `reqwest`-backed implementation of [`MediaBackend`]

use super::{BackendError, ExportResponse, MediaBackend, OutputChannel, OutputSelection};
use crate::export::{ExportRequest, ExportTarget};
use crate::media::{MediaDescriptor, SourceInfo, StorageType};
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Path of the multipart upload endpoint, relative to the base URL
pub const UPLOAD_PATH: &str = "upload/image";

/// Blocking HTTP client for the host server
///
/// Calls block the calling thread; the widget runs them on worker threads
/// where input handling must not wait.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

/// Upload response: `{"name": ..., "subfolder": ..., "type": ...}`
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "filename")]
    name: String,
    #[serde(default)]
    subfolder: String,
    #[serde(rename = "type", default)]
    storage_type: Option<StorageType>,
}

impl HttpBackend {
    /// Create a client for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if `base_url` does not parse, or
    /// `BackendError::Http` if the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .user_agent(concat!("vewd/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("{path}: {e}")))
    }

    fn check(path: &str, response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, BackendError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(BackendError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            })
        }
    }
}

impl MediaBackend for HttpBackend {
    fn view_url(&self, filename: &str, info: &SourceInfo) -> String {
        let cache_bust = chrono::Utc::now().timestamp_millis().to_string();
        match self.endpoint("view") {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("filename", filename)
                    .append_pair("subfolder", &info.subfolder)
                    .append_pair("type", info.storage_type.as_str())
                    .append_pair("t", &cache_bust);
                url.to_string()
            }
            Err(e) => {
                log::error!("Cannot build view URL: {e}");
                String::new()
            }
        }
    }

    fn export(&self, target: ExportTarget, request: &ExportRequest) -> Result<usize, BackendError> {
        let path = target.path();
        log::info!("POST /{path} with {} item(s) to {}", request.images.len(), request.folder);

        let response = self.client.post(self.endpoint(path)?).json(request).send()?;
        let body: ExportResponse = Self::check(path, response)?.json()?;
        body.into_result()
    }

    fn set_output(&self, channel: OutputChannel, selection: &OutputSelection) -> Result<(), BackendError> {
        let path = channel.path();
        log::debug!("POST /{path} filename={:?}", selection.filename);

        let response = self.client.post(self.endpoint(path)?).json(selection).send()?;
        Self::check(path, response)?;
        Ok(())
    }

    fn upload(&self, path: &Path, storage_type: StorageType) -> Result<MediaDescriptor, BackendError> {
        let form = multipart::Form::new()
            .file("image", path)?
            .text("type", storage_type.as_str().to_string());

        let response = self.client.post(self.endpoint(UPLOAD_PATH)?).multipart(form).send()?;
        let body: UploadResponse = Self::check(UPLOAD_PATH, response)?.json()?;

        Ok(MediaDescriptor::new(
            body.name,
            body.subfolder,
            body.storage_type.unwrap_or(storage_type),
        ))
    }

    fn resolves(&self, locator: &str) -> bool {
        match self.client.head(locator).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Locator {locator} did not resolve: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(HttpBackend::new("not a url"), Err(BackendError::InvalidUrl(_))));
    }

    #[test]
    fn test_view_url_encodes_query() {
        let backend = HttpBackend::new("http://127.0.0.1:8188").unwrap();
        let info = SourceInfo {
            subfolder: "my batch".into(),
            storage_type: StorageType::Temp,
            ..SourceInfo::default()
        };

        let url = backend.view_url("a&b.png", &info);

        assert!(url.starts_with("http://127.0.0.1:8188/view?filename=a%26b.png&subfolder=my+batch&type=temp&t="));
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let backend = HttpBackend::new("http://host/api/vewd").unwrap();
        assert_eq!(backend.endpoint("/export").unwrap().as_str(), "http://host/api/vewd/export");
    }

    #[test]
    fn test_resolves_false_when_unreachable() {
        let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
        assert!(!backend.resolves("http://127.0.0.1:9/view?filename=x.png"));
    }
}
