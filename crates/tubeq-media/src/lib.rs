//! yt-dlp wrapper for resolving and fetching source videos.
//!
//! This crate provides:
//! - A yt-dlp command builder
//! - Metadata resolution with a URL-pattern fallback
//! - Fetching to a local file with bounded failure messages
//! - A scoped local media file that cleans up after itself

pub mod command;
pub mod download;
pub mod error;
pub mod fs_utils;
pub mod resolve;

pub use command::{ToolOutput, YtDlpCommand, DEFAULT_YTDLP};
pub use download::{DownloadOptions, MediaDownloader, YtDlpDownloader, MAX_FAILURE_MESSAGE_CHARS};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{ScopedMediaFile, DEFAULT_MEDIA_FILE};
pub use resolve::{VideoResolver, YtDlpResolver};
