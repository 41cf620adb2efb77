//! Source video models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable external identifier of a source video (YouTube's 11-char id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Outcome of resolving a source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVideo {
    /// External id; `None` when neither the tool nor the URL yielded one
    pub video_id: Option<VideoId>,
    /// Display title used for the upload
    pub title: String,
}

impl ResolvedVideo {
    pub fn new(video_id: VideoId, title: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id),
            title: title.into(),
        }
    }

    /// Degraded result built from the URL alone.
    ///
    /// The title is `"Video <id>"`, or `"Video Unknown"` without an id.
    pub fn placeholder(video_id: Option<VideoId>) -> Self {
        let title = format!(
            "Video {}",
            video_id.as_ref().map(VideoId::as_str).unwrap_or("Unknown")
        );
        Self { video_id, title }
    }
}
