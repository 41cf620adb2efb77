//! Source URL → (video id, title) resolution.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use tubeq_models::{extract_video_id, ResolvedVideo, VideoId};

use crate::command::{YtDlpCommand, DEFAULT_YTDLP};
use crate::error::{MediaError, MediaResult};

/// Output template for metadata mode.
pub const METADATA_TEMPLATE: &str = "%(id)s|||%(title)s";

const FIELD_SEPARATOR: &str = "|||";

/// Resolves a source URL to its external id and title.
///
/// Resolution never fails outright; a missing id is reported through
/// [`ResolvedVideo::video_id`].
#[async_trait]
pub trait VideoResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> ResolvedVideo;
}

/// Resolver that asks yt-dlp first and falls back to URL patterns.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    program: PathBuf,
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_YTDLP)
    }
}

impl YtDlpResolver {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    /// Metadata-mode invocation for `url`.
    pub fn metadata_command(&self, url: &str) -> YtDlpCommand {
        YtDlpCommand::new(&self.program, url)
            .print(METADATA_TEMPLATE)
            .no_playlist()
    }

    /// Resolve through the tool only, without the URL fallback.
    pub async fn lookup_metadata(&self, url: &str) -> MediaResult<ResolvedVideo> {
        let output = self.metadata_command(url).run().await?;
        if !output.success() {
            return Err(MediaError::metadata_failed(output.diagnostic()));
        }
        parse_metadata(&output.stdout)
    }
}

#[async_trait]
impl VideoResolver for YtDlpResolver {
    async fn resolve(&self, url: &str) -> ResolvedVideo {
        match self.lookup_metadata(url).await {
            Ok(resolved) => {
                debug!(video_id = ?resolved.video_id, title = %resolved.title, "Resolved via yt-dlp");
                resolved
            }
            Err(e) => {
                warn!(url = %url, error = %e, "yt-dlp metadata lookup failed, using URL patterns");
                resolve_from_url(url)
            }
        }
    }
}

/// Parse `id|||title` printed by the tool.
///
/// Exactly two fields and a non-empty id are required. A blank title keeps
/// the id and takes the placeholder title.
pub fn parse_metadata(stdout: &str) -> MediaResult<ResolvedVideo> {
    let line = stdout.trim();
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    let [id, title] = fields.as_slice() else {
        return Err(MediaError::unparseable_output(format!(
            "expected 2 fields, got {}",
            fields.len()
        )));
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(MediaError::unparseable_output("empty video id"));
    }

    let video_id = VideoId::from(id);
    if title.trim().is_empty() {
        return Ok(ResolvedVideo::placeholder(Some(video_id)));
    }
    Ok(ResolvedVideo::new(video_id, *title))
}

/// Degraded resolution from the URL alone.
pub fn resolve_from_url(url: &str) -> ResolvedVideo {
    ResolvedVideo::placeholder(extract_video_id(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let resolved = parse_metadata("dQw4w9WgXcQ|||Never Gonna Give You Up\n").unwrap();
        assert_eq!(resolved.video_id, Some(VideoId::from("dQw4w9WgXcQ")));
        assert_eq!(resolved.title, "Never Gonna Give You Up");
    }

    #[test]
    fn test_parse_metadata_rejects_bad_shapes() {
        assert!(parse_metadata("").is_err());
        assert!(parse_metadata("no separator here").is_err());
        assert!(parse_metadata("|||Title only").is_err());
        // A separator inside the title yields three fields
        assert!(parse_metadata("abc123def45|||A ||| B").is_err());
    }

    #[test]
    fn test_parse_metadata_blank_title() {
        let resolved = parse_metadata("abc123def45|||  ").unwrap();
        assert_eq!(resolved.title, "Video abc123def45");
    }

    #[test]
    fn test_resolve_from_url() {
        let resolved = resolve_from_url("https://youtube.com/shorts/abc123def45");
        assert_eq!(resolved.video_id, Some(VideoId::from("abc123def45")));
        assert_eq!(resolved.title, "Video abc123def45");

        let resolved = resolve_from_url("https://vimeo.com/123456789");
        assert_eq!(resolved.video_id, None);
        assert_eq!(resolved.title, "Video Unknown");
    }

    #[test]
    fn test_metadata_command_args() {
        let args = YtDlpResolver::default()
            .metadata_command("https://youtu.be/dQw4w9WgXcQ")
            .build_args();
        assert_eq!(
            args,
            vec![
                "--print",
                "%(id)s|||%(title)s",
                "--no-playlist",
                "https://youtu.be/dQw4w9WgXcQ"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_tool_falls_back() {
        let resolver = YtDlpResolver::new("/nonexistent/bin/yt-dlp");
        let resolved = resolver.resolve("https://youtu.be/dQw4w9WgXcQ").await;
        assert_eq!(resolved.video_id, Some(VideoId::from("dQw4w9WgXcQ")));
        assert_eq!(resolved.title, "Video dQw4w9WgXcQ");
    }
}
