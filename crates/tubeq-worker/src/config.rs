//! Worker configuration.

use std::path::PathBuf;

use tubeq_media::{DownloadOptions, DEFAULT_MEDIA_FILE};
use tubeq_store::StoreConfig;
use tubeq_youtube::YoutubeConfig;

use crate::error::{WorkerError, WorkerResult};

/// Variables that must be present and non-empty.
pub const REQUIRED_VARS: [&str; 5] = [
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "YOUTUBE_CLIENT_ID",
    "YOUTUBE_CLIENT_SECRET",
    "YOUTUBE_REFRESH_TOKEN",
];

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub store: StoreConfig,
    pub youtube: YoutubeConfig,
    pub download: DownloadOptions,
    /// Fixed local path for the downloaded media
    pub media_file: PathBuf,
}

impl WorkerConfig {
    /// Build config from any variable source.
    ///
    /// Every missing required variable is reported at once.
    pub fn from_lookup<F>(lookup: F) -> WorkerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| present(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(WorkerError::config_error(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let store = StoreConfig::from_lookup(&lookup)?;
        let youtube = YoutubeConfig::from_lookup(&lookup)?;

        let mut download = DownloadOptions::default();
        if let Some(program) = present("YTDLP_PATH") {
            download.program = PathBuf::from(program);
        }
        if let Some(browser) = lookup("TUBEQ_COOKIES_BROWSER") {
            let browser = browser.trim();
            download.cookies_browser = (!browser.is_empty()).then(|| browser.to_string());
        }

        let media_file = present("TUBEQ_MEDIA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_FILE));

        Ok(Self {
            store,
            youtube,
            download,
            media_file,
        })
    }
}
