//! Errors raised at the HTTP boundary
//!
//! None of these reach the widget's caller: the widget logs them and turns
//! them into notices.

use thiserror::Error;

/// Failures talking to the host server
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    /// The server answered `{"success": false, "error": ...}`
    #[error("Server rejected request: {0}")]
    Rejected(String),

    /// The configured base URL or a built endpoint is malformed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A file selected for upload could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
