//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while running the downloader tool.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("yt-dlp not found: {0}")]
    YtDlpNotFound(String),

    /// Nonzero exit from a fetch; the message is already bounded for storage.
    #[error("{message}")]
    DownloadFailed { message: String },

    /// Nonzero exit in metadata mode.
    #[error("yt-dlp metadata lookup failed: {0}")]
    MetadataFailed(String),

    #[error("yt-dlp produced unusable output: {0}")]
    UnparseableOutput(String),

    #[error("Download reported success but {0} is missing")]
    OutputMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    pub fn metadata_failed(message: impl Into<String>) -> Self {
        Self::MetadataFailed(message.into())
    }

    pub fn unparseable_output(message: impl Into<String>) -> Self {
        Self::UnparseableOutput(message.into())
    }
}
