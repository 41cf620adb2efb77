//! Filesystem helpers for the transient media file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::MediaResult;

/// Default local filename for downloaded media.
pub const DEFAULT_MEDIA_FILE: &str = "downloaded_video.mp4";

/// A local media path that is removed when the guard goes away.
///
/// [`cleanup`](Self::cleanup) is the normal path; `Drop` is a synchronous
/// backstop for early returns and panics.
#[derive(Debug)]
pub struct ScopedMediaFile {
    path: PathBuf,
}

impl ScopedMediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove leftovers from an earlier run before downloading.
    pub async fn clear_stale(&self) -> MediaResult<()> {
        if remove_if_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "Removed stale media file");
        }
        Ok(())
    }

    /// Delete the file if present. Returns whether something was removed.
    pub async fn cleanup(&self) -> MediaResult<bool> {
        remove_if_exists(&self.path).await
    }
}

impl Drop for ScopedMediaFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed media file on drop");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove media file");
            }
        }
    }
}

/// Remove a file, treating "not found" as nothing to do.
pub async fn remove_if_exists(path: &Path) -> MediaResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
