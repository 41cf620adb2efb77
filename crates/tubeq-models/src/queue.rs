//! Queue entry models.
//!
//! A queue entry is one requested transfer job. Producers insert entries as
//! `pending`; the worker moves each claimed entry through
//! `pending -> processing -> {done | failed}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Description used when an entry carries no custom description.
pub const DEFAULT_DESCRIPTION: &str = "Uploaded via Automation";

/// Identifier of a queue entry.
///
/// The store may hand out UUIDs or integer keys; both are kept as their
/// textual form so they can be echoed back in filters unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => EntryId(s),
            RawId::Int(n) => EntryId(n.to_string()),
        })
    }
}

/// Lifecycle status of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Waiting for a worker
    #[default]
    Pending,
    /// Claimed by a worker
    Processing,
    /// Uploaded, or skipped as already processed
    Done,
    /// Processing failed; see `error_message`
    Failed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Done => "done",
            QueueStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row of the `video_queue` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,

    /// Source URL as submitted by the producer
    pub youtube_url: String,

    #[serde(default)]
    pub custom_description: Option<String>,

    #[serde(default)]
    pub status: QueueStatus,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Description to publish with the upload.
    ///
    /// Empty descriptions fall back to [`DEFAULT_DESCRIPTION`], the same as
    /// missing ones.
    pub fn description(&self) -> &str {
        match self.custom_description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_DESCRIPTION,
        }
    }
}

/// Insert payload for a new queue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQueueEntry {
    pub youtube_url: String,
    pub custom_description: String,
    pub status: QueueStatus,
}

impl NewQueueEntry {
    pub fn pending(youtube_url: impl Into<String>, custom_description: impl Into<String>) -> Self {
        Self {
            youtube_url: youtube_url.into(),
            custom_description: custom_description.into(),
            status: QueueStatus::Pending,
        }
    }
}

/// Partial update written back to a queue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: QueueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusUpdate {
    pub fn processing() -> Self {
        Self {
            status: QueueStatus::Processing,
            error_message: None,
        }
    }

    pub fn done() -> Self {
        Self {
            status: QueueStatus::Done,
            error_message: None,
        }
    }

    /// Done, with an explanatory note (e.g. skipped as a duplicate).
    pub fn done_with_note(note: impl Into<String>) -> Self {
        Self {
            status: QueueStatus::Done,
            error_message: Some(note.into()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: QueueStatus::Failed,
            error_message: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        for status in [
            QueueStatus::Pending,
            QueueStatus::Processing,
            QueueStatus::Done,
            QueueStatus::Failed,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::json!(status.as_str()));
        }
    }

    #[test]
    fn test_entry_from_store_row() {
        let row = r#"{
            "id": "6f1c2a9e-1d3b-4c55-9a0e-1b2c3d4e5f60",
            "youtube_url": "https://youtu.be/dQw4w9WgXcQ",
            "custom_description": null,
            "status": "pending",
            "error_message": null,
            "created_at": "2024-05-01T10:00:00.123456+00:00"
        }"#;

        let entry: QueueEntry = serde_json::from_str(row).unwrap();
        assert_eq!(entry.id.as_str(), "6f1c2a9e-1d3b-4c55-9a0e-1b2c3d4e5f60");
        assert_eq!(entry.status, QueueStatus::Pending);
        assert_eq!(entry.description(), DEFAULT_DESCRIPTION);
        assert!(entry.created_at.is_some());
    }

    #[test]
    fn test_entry_with_integer_id() {
        let row = r#"{"id": 42, "youtube_url": "https://youtu.be/dQw4w9WgXcQ", "status": "processing"}"#;
        let entry: QueueEntry = serde_json::from_str(row).unwrap();
        assert_eq!(entry.id, EntryId::from("42"));
        assert_eq!(entry.status, QueueStatus::Processing);
    }

    #[test]
    fn test_empty_description_falls_back() {
        let entry = QueueEntry {
            id: EntryId::from("1"),
            youtube_url: "https://youtu.be/dQw4w9WgXcQ".into(),
            custom_description: Some(String::new()),
            status: QueueStatus::Pending,
            error_message: None,
            created_at: None,
        };
        assert_eq!(entry.description(), DEFAULT_DESCRIPTION);

        let entry = QueueEntry {
            custom_description: Some("My clip".into()),
            ..entry
        };
        assert_eq!(entry.description(), "My clip");
    }

    #[test]
    fn test_status_update_serialization() {
        let json = serde_json::to_value(StatusUpdate::processing()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "processing" }));

        let json = serde_json::to_value(StatusUpdate::failed("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "failed", "error_message": "boom" })
        );
    }
}
