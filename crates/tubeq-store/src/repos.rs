//! Typed repositories for the queue and history tables.

use metrics::counter;
use tracing::info;

use tubeq_models::{
    is_supported_youtube_url, EntryId, HistoryRecord, NewQueueEntry, QueueEntry, QueueStatus,
    StatusUpdate, VideoId,
};

use crate::client::{Query, StoreClient};
use crate::error::{StoreError, StoreResult};

/// Table holding queue entries.
pub const QUEUE_TABLE: &str = "video_queue";

/// Table holding the dedup ledger.
pub const HISTORY_TABLE: &str = "history";

/// Repository for queue entries.
#[derive(Clone)]
pub struct QueueRepository {
    client: StoreClient,
}

impl QueueRepository {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Fetch one pending entry in the store's default order.
    pub async fn next_pending(&self) -> StoreResult<Option<QueueEntry>> {
        let query = Query::new().eq("status", QueueStatus::Pending).limit(1);
        let rows: Vec<QueueEntry> = self.client.select(QUEUE_TABLE, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Write a status (and optional message) back to an entry.
    pub async fn set_status(&self, id: &EntryId, update: &StatusUpdate) -> StoreResult<()> {
        let filter = Query::new().eq("id", id);
        self.client.update(QUEUE_TABLE, &filter, update).await?;
        counter!("queue_status_updates_total", "status" => update.status.as_str()).increment(1);
        Ok(())
    }

    /// Insert one pending entry per URL in a single request.
    ///
    /// Blank lines are ignored. If any URL is not a single-video YouTube
    /// link, nothing is inserted and the offending URLs are reported.
    pub async fn enqueue<S: AsRef<str>>(&self, urls: &[S], description: Option<&str>) -> StoreResult<usize> {
        let urls: Vec<&str> = urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .collect();

        if urls.is_empty() {
            return Err(StoreError::request_failed("no URLs to enqueue"));
        }

        let invalid: Vec<String> = urls
            .iter()
            .filter(|u| !is_supported_youtube_url(u))
            .map(|u| u.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(StoreError::InvalidUrls(invalid));
        }

        let description = description.unwrap_or_default();
        let rows: Vec<NewQueueEntry> = urls
            .iter()
            .map(|u| NewQueueEntry::pending(*u, description))
            .collect();

        self.client.insert(QUEUE_TABLE, &rows).await?;
        info!(count = rows.len(), "Enqueued videos");
        Ok(rows.len())
    }

    /// Remove an entry from the queue.
    pub async fn delete(&self, id: &EntryId) -> StoreResult<()> {
        let filter = Query::new().eq("id", id);
        self.client.delete(QUEUE_TABLE, &filter).await?;
        info!(entry_id = %id, "Deleted queue entry");
        Ok(())
    }

    /// List entries, newest first.
    pub async fn list_recent(&self, limit: Option<usize>) -> StoreResult<Vec<QueueEntry>> {
        let mut query = Query::new().order_desc("created_at");
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.client.select(QUEUE_TABLE, &query).await
    }
}

/// Repository for the history ledger.
#[derive(Clone)]
pub struct HistoryRepository {
    client: StoreClient,
}

impl HistoryRepository {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Whether a record for `video_id` exists.
    pub async fn contains(&self, video_id: &VideoId) -> StoreResult<bool> {
        let query = Query::new().eq("video_id", video_id);
        let rows: Vec<HistoryRecord> = self.client.select(HISTORY_TABLE, &query).await?;
        Ok(!rows.is_empty())
    }

    /// Append a record. Uniqueness is not checked here.
    pub async fn record(&self, video_id: &VideoId) -> StoreResult<()> {
        self.client
            .insert(HISTORY_TABLE, &HistoryRecord::new(video_id.clone()))
            .await?;
        info!(video_id = %video_id, "Recorded history");
        Ok(())
    }
}
