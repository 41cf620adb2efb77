//! Utility functions for URL parsing and validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::VideoId;

/// URL shapes that embed a video id, tried in order; the first match wins.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // watch links and youtu.be short links
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([\w-]{11})").unwrap(),
        Regex::new(r"youtube\.com/shorts/([\w-]{11})").unwrap(),
        Regex::new(r"youtube\.com/embed/([\w-]{11})").unwrap(),
    ]
});

/// Shape accepted from producers when enqueueing. Ids are ASCII-only here.
static SUBMITTED_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/(watch\?v=|embed/|v/|shorts/|)([A-Za-z0-9_-]{11})(.*)?$",
    )
    .unwrap()
});

/// Extract the 11-character video id embedded in a URL.
///
/// Supports:
/// - https://youtube.com/watch?v=VIDEO_ID
/// - https://youtu.be/VIDEO_ID
/// - https://youtube.com/shorts/VIDEO_ID
/// - https://youtube.com/embed/VIDEO_ID
///
/// Returns `None` when no pattern matches.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId::from(m.as_str()))
}

/// Check whether a submitted URL looks like a single YouTube video link.
pub fn is_supported_youtube_url(url: &str) -> bool {
    SUBMITTED_URL_PATTERN.is_match(url.trim())
}

/// Truncate to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
