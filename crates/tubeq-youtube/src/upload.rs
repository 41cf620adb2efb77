//! Resumable upload session.
//!
//! After the session is opened, each `PUT` carries one chunk with a
//! `Content-Range` header. The server answers `308 Resume Incomplete` with a
//! `Range: bytes=0-N` header until the last chunk, which returns the video
//! resource with `200`/`201`.

use std::io::SeekFrom;
use std::path::Path;

use metrics::counter;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

use crate::error::{YoutubeError, YoutubeResult};
use crate::types::{UploadProgress, UploadedVideo};

/// Chunk sizes must be a multiple of this (256 KiB).
pub const CHUNK_GRANULARITY: usize = 256 * 1024;

/// `308 Resume Incomplete`.
const RESUME_INCOMPLETE: u16 = 308;

/// Round a requested chunk size down to the protocol granularity, keeping at
/// least one unit.
pub fn normalize_chunk_size(requested: usize) -> usize {
    (requested / CHUNK_GRANULARITY).max(1) * CHUNK_GRANULARITY
}

/// Result of sending one chunk.
#[derive(Debug)]
pub enum UploadStep {
    /// More bytes remain.
    Progress(UploadProgress),
    /// The server returned the created video.
    Complete(UploadedVideo),
}

/// An open resumable upload of one local file.
pub struct ResumableUpload {
    http: Client,
    session_uri: String,
    access_token: String,
    file: File,
    total_bytes: u64,
    offset: u64,
    chunk_size: usize,
}

impl ResumableUpload {
    pub(crate) async fn open(
        http: Client,
        session_uri: String,
        access_token: String,
        path: &Path,
        chunk_size: usize,
    ) -> YoutubeResult<Self> {
        let file = File::open(path).await?;
        let total_bytes = file.metadata().await?.len();
        if total_bytes == 0 {
            return Err(YoutubeError::EmptyFile(path.to_path_buf()));
        }

        Ok(Self {
            http,
            session_uri,
            access_token,
            file,
            total_bytes,
            offset: 0,
            chunk_size: normalize_chunk_size(chunk_size),
        })
    }

    pub fn progress(&self) -> UploadProgress {
        UploadProgress {
            bytes_sent: self.offset,
            total_bytes: self.total_bytes,
        }
    }

    /// Replace the bearer token used for subsequent chunks.
    pub fn set_access_token(&mut self, token: String) {
        self.access_token = token;
    }

    /// Send the next chunk. Errors are final; nothing is retried.
    pub async fn next_chunk(&mut self) -> YoutubeResult<UploadStep> {
        let remaining = self.total_bytes - self.offset;

        let request = self
            .http
            .put(&self.session_uri)
            .bearer_auth(&self.access_token);

        let (request, sent) = if remaining == 0 {
            // Everything acknowledged but no resource yet: ask for the final status.
            let range = format!("bytes */{}", self.total_bytes);
            (request.header(CONTENT_RANGE, range).body(Vec::new()), 0)
        } else {
            let len = remaining.min(self.chunk_size as u64);
            let chunk = self.read_chunk(len).await?;
            let end = self.offset + len - 1;
            let range = format!("bytes {}-{}/{}", self.offset, end, self.total_bytes);
            debug!(range = %range, "Sending upload chunk");
            (request.header(CONTENT_RANGE, range).body(chunk), len)
        };

        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200 | 201 => {
                counter!("youtube_upload_chunks_total").increment(1);
                counter!("youtube_upload_bytes_total").increment(sent);
                let body = response.text().await?;
                let video: UploadedVideo = serde_json::from_str(&body).map_err(|e| {
                    YoutubeError::invalid_response(format!("final upload response: {}", e))
                })?;
                self.offset = self.total_bytes;
                Ok(UploadStep::Complete(video))
            }
            RESUME_INCOMPLETE => {
                counter!("youtube_upload_chunks_total").increment(1);
                counter!("youtube_upload_bytes_total").increment(sent);
                let acknowledged = match response.headers().get(RANGE) {
                    Some(value) => {
                        let value = value.to_str().map_err(|_| {
                            YoutubeError::invalid_response("non-ASCII Range header")
                        })?;
                        parse_range_end(value)
                            .and_then(|end| end.checked_add(1))
                            .ok_or_else(|| {
                                YoutubeError::invalid_response(format!("bad Range header: {}", value))
                            })?
                    }
                    None => 0,
                };

                if acknowledged <= self.offset || acknowledged > self.total_bytes {
                    return Err(YoutubeError::upload_failed(format!(
                        "server acknowledged {} of {} bytes after offset {}",
                        acknowledged, self.total_bytes, self.offset
                    )));
                }

                self.offset = acknowledged;
                Ok(UploadStep::Progress(self.progress()))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(error_for_status(status, body))
            }
        }
    }

    async fn read_chunk(&mut self, len: u64) -> YoutubeResult<Vec<u8>> {
        self.file.seek(SeekFrom::Start(self.offset)).await?;
        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf).await?;
        Ok(buf)
    }
}

/// Last acknowledged byte from a `Range: bytes=0-N` header.
pub fn parse_range_end(value: &str) -> Option<u64> {
    let range = value.trim().strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    start.trim().parse::<u64>().ok()?;
    end.trim().parse().ok()
}

pub(crate) fn error_for_status(status: StatusCode, body: String) -> YoutubeError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if body.contains("authError") => {
            YoutubeError::auth_error(body)
        }
        _ => YoutubeError::api(status.as_u16(), body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_chunk_size() {
        assert_eq!(normalize_chunk_size(0), CHUNK_GRANULARITY);
        assert_eq!(normalize_chunk_size(1), CHUNK_GRANULARITY);
        assert_eq!(normalize_chunk_size(CHUNK_GRANULARITY * 3 + 17), CHUNK_GRANULARITY * 3);
        assert_eq!(normalize_chunk_size(8 * 1024 * 1024), 8 * 1024 * 1024);
    }

    #[test]
    fn test_parse_range_end() {
        assert_eq!(parse_range_end("bytes=0-262143"), Some(262143));
        assert_eq!(parse_range_end(" bytes=0-0 "), Some(0));
        assert_eq!(parse_range_end("bytes 0-10"), None);
        assert_eq!(parse_range_end("bytes=0-"), None);
        assert_eq!(parse_range_end("bytes=x-10"), None);
    }

    #[test]
    fn test_error_for_status() {
        let err = error_for_status(StatusCode::FORBIDDEN, r#"{"error":{"errors":[{"reason":"quotaExceeded"}]}}"#.into());
        assert!(matches!(err, YoutubeError::Api { status: 403, .. }));

        let err = error_for_status(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"errors":[{"reason":"authError"}]}}"#.into(),
        );
        assert!(matches!(err, YoutubeError::AuthError(_)));
    }
}
