//! YouTube Data API upload client.
//!
//! Refresh-token OAuth plus the resumable, chunked `videos.insert` upload.

pub mod client;
pub mod error;
pub mod token_cache;
pub mod types;
pub mod upload;

pub use client::{VideoUploader, YoutubeClient, YoutubeConfig, DEFAULT_CHUNK_SIZE};
pub use error::{YoutubeError, YoutubeResult};
pub use token_cache::{OAuthCredentials, TokenCache};
pub use types::{PrivacyStatus, UploadProgress, UploadedVideo, VideoResource};
pub use upload::{ResumableUpload, UploadStep, CHUNK_GRANULARITY};
