//! Errors from the local state database

use thiserror::Error;

/// Failures reading or writing persisted widget state
#[derive(Debug, Error)]
pub enum PersistError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding state: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding state: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Record written by a newer format than this build understands
    #[error("Unsupported state version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Instance key stored in the database is not UTF-8
    #[error("Invalid instance key: {0}")]
    InvalidKey(String),
}
