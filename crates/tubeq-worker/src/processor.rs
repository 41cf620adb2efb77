//! Queue processing orchestration.
//!
//! One invocation handles at most one entry:
//! claim → resolve → dedup → download → upload → record, with the local
//! media file removed on every path.

use metrics::counter;
use tracing::{debug, info, Instrument};

use tubeq_media::ScopedMediaFile;
use tubeq_models::{EntryId, QueueEntry, StatusUpdate, VideoId};
use tubeq_youtube::UploadProgress;

use crate::context::ProcessingContext;
use crate::error::{EntryError, WorkerResult};
use crate::logging::EntryLogger;

/// Note stored on entries skipped as duplicates.
pub const ALREADY_PROCESSED: &str = "Already processed";

/// What happened to a claimed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Uploaded and recorded in history.
    Uploaded { video_id: VideoId, platform_id: String },
    /// Found in history; nothing downloaded.
    AlreadyProcessed { video_id: VideoId },
    /// Marked failed with this message.
    Failed { error: String },
}

impl EntryOutcome {
    fn label(&self) -> &'static str {
        match self {
            EntryOutcome::Uploaded { .. } => "uploaded",
            EntryOutcome::AlreadyProcessed { .. } => "already_processed",
            EntryOutcome::Failed { .. } => "failed",
        }
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// No pending entry.
    Idle,
    Processed { entry_id: EntryId, outcome: EntryOutcome },
}

/// Sequential single-entry processor.
pub struct QueueProcessor {
    ctx: ProcessingContext,
}

impl QueueProcessor {
    pub fn new(ctx: ProcessingContext) -> Self {
        Self { ctx }
    }

    /// Claim and process at most one pending entry.
    ///
    /// Per-entry failures are written to the entry and reported as
    /// [`EntryOutcome::Failed`]. An `Err` means the store could not be read,
    /// the claim could not be written, or the failure itself could not be
    /// recorded.
    pub async fn process_next(&self) -> WorkerResult<ProcessOutcome> {
        let Some(entry) = self.ctx.store.next_pending().await? else {
            info!("No pending videos");
            return Ok(ProcessOutcome::Idle);
        };

        // Claim before any work. Not atomic: a concurrent worker can read the
        // same row between the select and this update.
        self.ctx
            .store
            .update_status(&entry.id, StatusUpdate::processing())
            .await?;

        let logger = EntryLogger::new(&entry.id, "transfer");
        let span = logger.create_span();
        let outcome = self.process_claimed(&entry, &logger).instrument(span).await?;

        counter!("queue_entries_processed_total", "outcome" => outcome.label()).increment(1);
        Ok(ProcessOutcome::Processed {
            entry_id: entry.id,
            outcome,
        })
    }

    async fn process_claimed(&self, entry: &QueueEntry, logger: &EntryLogger) -> WorkerResult<EntryOutcome> {
        logger.log_start(&entry.youtube_url);

        let media = ScopedMediaFile::new(&self.ctx.media_file);
        let result = self.run_stages(entry, &media, logger).await;

        match media.cleanup().await {
            Ok(true) => debug!(path = %media.path().display(), "Removed local media file"),
            Ok(false) => {}
            Err(e) => logger.log_warning(&format!("Failed to remove local media file: {}", e)),
        }

        match result {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let message = err.to_string();
                logger.log_error(&format!("[{}] {}", err.stage(), message));
                self.ctx
                    .store
                    .update_status(&entry.id, StatusUpdate::failed(message.clone()))
                    .await?;
                Ok(EntryOutcome::Failed { error: message })
            }
        }
    }

    async fn run_stages(
        &self,
        entry: &QueueEntry,
        media: &ScopedMediaFile,
        logger: &EntryLogger,
    ) -> Result<EntryOutcome, EntryError> {
        let ctx = &self.ctx;

        let resolved = ctx.resolver.resolve(&entry.youtube_url).await;
        let video_id = resolved.video_id.clone().ok_or(EntryError::VideoIdNotFound)?;
        logger.log_progress(&format!("Resolved {} ({})", video_id, resolved.title));

        if ctx
            .store
            .history_contains(&video_id)
            .await
            .map_err(EntryError::HistoryLookup)?
        {
            ctx.store
                .update_status(&entry.id, StatusUpdate::done_with_note(ALREADY_PROCESSED))
                .await
                .map_err(EntryError::Status)?;
            logger.log_completion(&format!("{} already processed, skipping", video_id));
            return Ok(EntryOutcome::AlreadyProcessed { video_id });
        }

        media.clear_stale().await.map_err(EntryError::Download)?;
        ctx.downloader
            .download(&entry.youtube_url, media.path())
            .await
            .map_err(EntryError::Download)?;
        logger.log_progress("Download complete");

        let on_progress = |progress: UploadProgress| logger.log_upload_progress(progress);
        let uploaded = ctx
            .uploader
            .upload(media.path(), &resolved.title, entry.description(), &on_progress)
            .await
            .map_err(EntryError::Upload)?;

        ctx.store
            .update_status(&entry.id, StatusUpdate::done())
            .await
            .map_err(EntryError::Status)?;
        ctx.store
            .record_history(&video_id)
            .await
            .map_err(EntryError::HistoryRecord)?;

        logger.log_completion(&format!("Uploaded {} as {}", video_id, uploaded.id));
        Ok(EntryOutcome::Uploaded {
            video_id,
            platform_id: uploaded.id,
        })
    }
}
