//! YouTube upload client.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use reqwest::header::LOCATION;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::{YoutubeError, YoutubeResult};
use crate::token_cache::{OAuthCredentials, TokenCache, GOOGLE_TOKEN_URI};
use crate::types::{UploadProgress, UploadedVideo, VideoResource};
use crate::upload::{error_for_status, normalize_chunk_size, ResumableUpload, UploadStep};

/// Media upload endpoint for `videos.insert`.
pub const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Default chunk size (8 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Content type announced for the media body.
const UPLOAD_CONTENT_TYPE: &str = "video/*";

/// Configuration for the upload client.
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub credentials: OAuthCredentials,
    /// `videos.insert` media endpoint
    pub upload_url: String,
    /// Bytes per chunk, a multiple of 256 KiB
    pub chunk_size: usize,
    /// Per-request timeout
    pub timeout: Duration,
}

impl YoutubeConfig {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: Duration::from_secs(300),
        }
    }

    /// Build config from any variable source.
    ///
    /// `TUBEQ_UPLOAD_CHUNK_SIZE` is rounded down to the chunk granularity.
    pub fn from_lookup<F>(lookup: F) -> YoutubeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| YoutubeError::config_error(format!("Missing environment variable: {}", name)))
        };

        let credentials = OAuthCredentials {
            client_id: required("YOUTUBE_CLIENT_ID")?,
            client_secret: required("YOUTUBE_CLIENT_SECRET")?,
            refresh_token: required("YOUTUBE_REFRESH_TOKEN")?,
            token_uri: GOOGLE_TOKEN_URI.to_string(),
        };

        let chunk_size = lookup("TUBEQ_UPLOAD_CHUNK_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .map(normalize_chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE);

        Ok(Self {
            chunk_size,
            ..Self::new(credentials)
        })
    }
}

/// Uploads a local file and returns the created video.
#[async_trait]
pub trait VideoUploader: Send + Sync {
    async fn upload(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        on_progress: &(dyn Fn(UploadProgress) + Send + Sync),
    ) -> YoutubeResult<UploadedVideo>;
}

/// YouTube Data API upload client.
#[derive(Clone)]
pub struct YoutubeClient {
    http: Client,
    config: YoutubeConfig,
    tokens: Arc<TokenCache>,
}

impl YoutubeClient {
    /// Create a new upload client.
    pub fn new(config: YoutubeConfig) -> YoutubeResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("tubeq-youtube/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(YoutubeError::Network)?;

        let tokens = Arc::new(TokenCache::new(http.clone(), config.credentials.clone()));

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Open a resumable session for `path` with the given metadata.
    pub async fn start_upload(&self, path: &Path, resource: &VideoResource) -> YoutubeResult<ResumableUpload> {
        let total_bytes = tokio::fs::metadata(path).await?.len();
        if total_bytes == 0 {
            return Err(YoutubeError::EmptyFile(path.to_path_buf()));
        }

        let mut url = Url::parse(&self.config.upload_url)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "resumable")
            .append_pair("part", "snippet,status");

        let token = self.tokens.get_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&token)
            .header("X-Upload-Content-Type", UPLOAD_CONTENT_TYPE)
            .header("X-Upload-Content-Length", total_bytes.to_string())
            .json(resource)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }

        let session_uri = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| YoutubeError::invalid_response("upload session has no Location header"))?
            .to_string();
        debug!(total_bytes, "Opened resumable upload session");

        ResumableUpload::open(self.http.clone(), session_uri, token, path, self.config.chunk_size).await
    }
}

#[async_trait]
impl VideoUploader for YoutubeClient {
    async fn upload(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        on_progress: &(dyn Fn(UploadProgress) + Send + Sync),
    ) -> YoutubeResult<UploadedVideo> {
        let start = Instant::now();
        let resource = VideoResource::automation(title, description);
        let mut upload = self.start_upload(path, &resource).await?;

        let video = loop {
            upload.set_access_token(self.tokens.get_token().await?);
            match upload.next_chunk().await? {
                UploadStep::Progress(progress) => on_progress(progress),
                UploadStep::Complete(video) => {
                    on_progress(upload.progress());
                    break video;
                }
            }
        };

        histogram!("youtube_upload_seconds").record(start.elapsed().as_secs_f64());
        info!(youtube_id = %video.id, "Upload complete");
        Ok(video)
    }
}
