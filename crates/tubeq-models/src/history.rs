//! History ledger model.

use serde::{Deserialize, Serialize};

use crate::VideoId;

/// A row of the `history` table: one per uploaded source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub video_id: VideoId,
}

impl HistoryRecord {
    pub fn new(video_id: VideoId) -> Self {
        Self { video_id }
    }
}
