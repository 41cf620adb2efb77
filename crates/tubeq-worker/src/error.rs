//! Worker error types.
//!
//! [`WorkerError`] ends the invocation. [`EntryError`] fails one entry and is
//! written to its `error_message`.

use thiserror::Error;

use tubeq_media::MediaError;
use tubeq_store::StoreError;
use tubeq_youtube::YoutubeError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Workflow dispatch failed ({status}): {body}")]
    DispatchFailed { status: u16, body: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("YouTube error: {0}")]
    Youtube(#[from] YoutubeError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Message stored when an entry's URL yields no video id.
pub const VIDEO_ID_NOT_FOUND: &str = "Could not extract video ID from URL";

/// Why a single entry failed, by stage.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("{}", VIDEO_ID_NOT_FOUND)]
    VideoIdNotFound,

    /// Preparing the local file or running the downloader.
    #[error(transparent)]
    Download(MediaError),

    #[error("Upload failed: {0}")]
    Upload(YoutubeError),

    #[error("History lookup failed: {0}")]
    HistoryLookup(StoreError),

    #[error("Failed to record history: {0}")]
    HistoryRecord(StoreError),

    #[error("Failed to update entry status: {0}")]
    Status(StoreError),
}

impl EntryError {
    /// Short stage name for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            EntryError::VideoIdNotFound => "resolve",
            EntryError::Download(_) => "download",
            EntryError::Upload(_) => "upload",
            EntryError::HistoryLookup(_) => "dedup",
            EntryError::HistoryRecord(_) => "history",
            EntryError::Status(_) => "status",
        }
    }
}
