//! Shared data models for the tubeq queue worker.
//!
//! This crate provides Serde-serializable types for:
//! - Queue entries and their status lifecycle
//! - The history ledger used for deduplication
//! - Resolved source videos
//! - URL helpers (video ID extraction, producer-side URL validation)

pub mod history;
pub mod queue;
pub mod utils;
pub mod video;

// Re-export common types
pub use history::HistoryRecord;
pub use queue::{EntryId, NewQueueEntry, QueueEntry, QueueStatus, StatusUpdate, DEFAULT_DESCRIPTION};
pub use utils::{extract_video_id, is_supported_youtube_url, truncate_chars};
pub use video::{ResolvedVideo, VideoId};
