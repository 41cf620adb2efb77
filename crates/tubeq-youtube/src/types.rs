//! YouTube Data API resource types.

use serde::{Deserialize, Serialize};

/// Tag attached to every automated upload.
pub const AUTOMATION_TAG: &str = "automation";

/// "People & Blogs".
pub const DEFAULT_CATEGORY_ID: &str = "22";

/// Video snippet part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: String,
}

/// Visibility of an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    #[default]
    Private,
    Unlisted,
    Public,
}

/// Video status part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub privacy_status: PrivacyStatus,
}

/// Metadata sent when opening an upload session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoResource {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

impl VideoResource {
    /// Private upload tagged as automation in the default category.
    pub fn automation(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            snippet: VideoSnippet {
                title: title.into(),
                description: description.into(),
                tags: vec![AUTOMATION_TAG.to_string()],
                category_id: DEFAULT_CATEGORY_ID.to_string(),
            },
            status: VideoStatus {
                privacy_status: PrivacyStatus::Private,
            },
        }
    }
}

/// Video resource returned once the upload completes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedVideo {
    /// Platform-assigned video id
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub status: Option<UploadedStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedStatus {
    #[serde(default)]
    pub upload_status: Option<String>,
    #[serde(default)]
    pub privacy_status: Option<PrivacyStatus>,
}

/// Bytes acknowledged by the server so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Fraction in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        self.bytes_sent as f64 / self.total_bytes as f64
    }

    /// Whole percentage, rounded down.
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_automation_resource_shape() {
        let resource = VideoResource::automation("My title", "Uploaded via Automation");
        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(
            value,
            json!({
                "snippet": {
                    "title": "My title",
                    "description": "Uploaded via Automation",
                    "tags": ["automation"],
                    "categoryId": "22"
                },
                "status": { "privacyStatus": "private" }
            })
        );
    }

    #[test]
    fn test_uploaded_video_parsing() {
        let video: UploadedVideo = serde_json::from_value(json!({
            "kind": "youtube#video",
            "id": "xyz789ABCde",
            "status": { "uploadStatus": "uploaded", "privacyStatus": "private" }
        }))
        .unwrap();

        assert_eq!(video.id, "xyz789ABCde");
        let status = video.status.unwrap();
        assert_eq!(status.upload_status.as_deref(), Some("uploaded"));
        assert_eq!(status.privacy_status, Some(PrivacyStatus::Private));
    }

    #[test]
    fn test_progress_percent() {
        let progress = UploadProgress {
            bytes_sent: 1,
            total_bytes: 3,
        };
        assert_eq!(progress.percent(), 33);

        let done = UploadProgress {
            bytes_sent: 3,
            total_bytes: 3,
        };
        assert_eq!(done.percent(), 100);
    }
}
