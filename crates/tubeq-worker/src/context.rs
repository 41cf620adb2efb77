//! Long-lived clients shared by every processing step.

use std::path::PathBuf;
use std::sync::Arc;

use tubeq_media::{MediaDownloader, VideoResolver, YtDlpDownloader, YtDlpResolver};
use tubeq_store::{QueueStore, StoreClient, SupabaseStore};
use tubeq_youtube::{VideoUploader, YoutubeClient};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Clients the processor works through, built once by `main`.
#[derive(Clone)]
pub struct ProcessingContext {
    pub store: Arc<dyn QueueStore>,
    pub resolver: Arc<dyn VideoResolver>,
    pub downloader: Arc<dyn MediaDownloader>,
    pub uploader: Arc<dyn VideoUploader>,
    /// Fixed local path for the downloaded media
    pub media_file: PathBuf,
}

impl ProcessingContext {
    /// Build production clients from configuration. Performs no I/O.
    pub fn from_config(config: &WorkerConfig) -> WorkerResult<Self> {
        let store = SupabaseStore::new(StoreClient::new(config.store.clone())?);
        let uploader = YoutubeClient::new(config.youtube.clone())?;

        Ok(Self {
            store: Arc::new(store),
            resolver: Arc::new(YtDlpResolver::new(&config.download.program)),
            downloader: Arc::new(YtDlpDownloader::new(config.download.clone())),
            uploader: Arc::new(uploader),
            media_file: config.media_file.clone(),
        })
    }
}
