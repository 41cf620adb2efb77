//! Queue store seam used by the worker.

use async_trait::async_trait;

use tubeq_models::{EntryId, QueueEntry, StatusUpdate, VideoId};

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::repos::{HistoryRepository, QueueRepository};

/// Operations the queue processor needs from persistent storage.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// One pending entry, if any.
    async fn next_pending(&self) -> StoreResult<Option<QueueEntry>>;

    async fn update_status(&self, id: &EntryId, update: StatusUpdate) -> StoreResult<()>;

    async fn history_contains(&self, video_id: &VideoId) -> StoreResult<bool>;

    async fn record_history(&self, video_id: &VideoId) -> StoreResult<()>;
}

/// [`QueueStore`] backed by Supabase tables.
#[derive(Clone)]
pub struct SupabaseStore {
    queue: QueueRepository,
    history: HistoryRepository,
}

impl SupabaseStore {
    pub fn new(client: StoreClient) -> Self {
        Self {
            queue: QueueRepository::new(client.clone()),
            history: HistoryRepository::new(client),
        }
    }
}

#[async_trait]
impl QueueStore for SupabaseStore {
    async fn next_pending(&self) -> StoreResult<Option<QueueEntry>> {
        self.queue.next_pending().await
    }

    async fn update_status(&self, id: &EntryId, update: StatusUpdate) -> StoreResult<()> {
        self.queue.set_status(id, &update).await
    }

    async fn history_contains(&self, video_id: &VideoId) -> StoreResult<bool> {
        self.history.contains(video_id).await
    }

    async fn record_history(&self, video_id: &VideoId) -> StoreResult<()> {
        self.history.record(video_id).await
    }
}
