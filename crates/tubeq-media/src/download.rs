//! Video download using yt-dlp.
//!
//! One fetch per call: no retry beyond yt-dlp's own `--retries`. A failed
//! fetch becomes [`MediaError::DownloadFailed`] with a message that is safe to
//! store as the entry's error text.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use tracing::{debug, info};

use tubeq_models::truncate_chars;

use crate::command::{ToolOutput, YtDlpCommand, DEFAULT_YTDLP};
use crate::error::{MediaError, MediaResult};

/// Upper bound on a stored download failure message, in characters.
pub const MAX_FAILURE_MESSAGE_CHARS: usize = 200;

/// Desktop browser user-agent sent to the source site.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Downloads a source URL to a local path.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, url: &str, output_path: &Path) -> MediaResult<()>;
}

/// Options for fetch-mode invocations.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// yt-dlp executable
    pub program: PathBuf,
    pub user_agent: String,
    /// Value for `--extractor-args`
    pub extractor_args: String,
    /// Browser to borrow cookies from; `None` disables
    pub cookies_browser: Option<String>,
    pub retries: u32,
    pub fragment_retries: u32,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_YTDLP),
            user_agent: DESKTOP_USER_AGENT.to_string(),
            extractor_args: "youtube:player_client=web".to_string(),
            cookies_browser: Some("chrome".to_string()),
            retries: 3,
            fragment_retries: 3,
        }
    }
}

/// [`MediaDownloader`] backed by yt-dlp.
#[derive(Debug, Clone, Default)]
pub struct YtDlpDownloader {
    options: DownloadOptions,
}

impl YtDlpDownloader {
    pub fn new(options: DownloadOptions) -> Self {
        Self { options }
    }

    /// Fetch-mode invocation writing `url` to `output_path`.
    pub fn download_command(&self, url: &str, output_path: &Path) -> YtDlpCommand {
        let opts = &self.options;
        let mut cmd = YtDlpCommand::new(&opts.program, url)
            .user_agent(&opts.user_agent)
            .extractor_args(&opts.extractor_args);

        if let Some(browser) = &opts.cookies_browser {
            cmd = cmd.cookies_from_browser(browser);
        }

        cmd.retries(opts.retries)
            .fragment_retries(opts.fragment_retries)
            .output(output_path)
            .no_playlist()
    }
}

#[async_trait]
impl MediaDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, output_path: &Path) -> MediaResult<()> {
        info!(url = %url, output = %output_path.display(), "Downloading video");

        let start = Instant::now();
        let output = self.download_command(url, output_path).run().await?;

        if !output.success() {
            counter!("media_downloads_total", "status" => "failed").increment(1);
            debug!("yt-dlp stderr: {}", output.stderr);
            return Err(MediaError::download_failed(failure_message(&output)));
        }

        if !tokio::fs::try_exists(output_path).await? {
            counter!("media_downloads_total", "status" => "missing_output").increment(1);
            return Err(MediaError::OutputMissing(output_path.to_path_buf()));
        }

        let file_size = tokio::fs::metadata(output_path).await?.len();
        counter!("media_downloads_total", "status" => "success").increment(1);
        histogram!("media_download_seconds").record(start.elapsed().as_secs_f64());

        info!(
            output = %output_path.display(),
            size_mb = file_size as f64 / (1024.0 * 1024.0),
            "Downloaded video successfully"
        );
        Ok(())
    }
}

/// Storable failure text: `"yt-dlp failed: <diagnostic>"`, capped at
/// [`MAX_FAILURE_MESSAGE_CHARS`].
pub fn failure_message(output: &ToolOutput) -> String {
    truncate_chars(
        &format!("yt-dlp failed: {}", output.diagnostic()),
        MAX_FAILURE_MESSAGE_CHARS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_command_args() {
        let args = YtDlpDownloader::default()
            .download_command("https://youtu.be/dQw4w9WgXcQ", Path::new("downloaded_video.mp4"))
            .build_args();

        assert_eq!(
            args,
            vec![
                "--user-agent",
                DESKTOP_USER_AGENT,
                "--extractor-args",
                "youtube:player_client=web",
                "--cookies-from-browser",
                "chrome",
                "--retries",
                "3",
                "--fragment-retries",
                "3",
                "-o",
                "downloaded_video.mp4",
                "--no-playlist",
                "https://youtu.be/dQw4w9WgXcQ",
            ]
        );
    }

    #[test]
    fn test_cookies_can_be_disabled() {
        let downloader = YtDlpDownloader::new(DownloadOptions {
            cookies_browser: None,
            ..Default::default()
        });
        let args = downloader
            .download_command("https://youtu.be/dQw4w9WgXcQ", Path::new("out.mp4"))
            .build_args();
        assert!(!args.iter().any(|a| a == "--cookies-from-browser"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_message_is_bounded() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        let output = ToolOutput {
            status: ExitStatus::from_raw(256),
            stdout: String::new(),
            stderr: "ERROR: ".to_string() + &"x".repeat(500),
        };
        let message = failure_message(&output);
        assert!(message.starts_with("yt-dlp failed: ERROR: "));
        assert_eq!(message.chars().count(), MAX_FAILURE_MESSAGE_CHARS);
    }
}
