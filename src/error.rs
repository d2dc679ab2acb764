//! Error types for playlist-dl
//!
//! Only conditions that stop a run (or a component) are errors here. A single
//! failed download is not an error: it is reported as a
//! [`FetchOutcome`](crate::downloader::FetchOutcome) and handled by the retry
//! controller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_retries")
        key: Option<String>,
    },

    /// The URL list could not be read
    #[error("failed to read URL file {}: {source}", path.display())]
    UrlFile {
        /// Path of the URL list
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The external download tool is not installed or does not run
    #[error("download tool not found: {0}")]
    ToolNotFound(String),

    /// Log sink could not be set up
    #[error("logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the URL list is simply absent (as opposed to unreadable)
    pub fn is_missing_url_file(&self) -> bool {
        matches!(
            self,
            Error::UrlFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
