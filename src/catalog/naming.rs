//! Naming rules: display names, normalized names, sample and season detection

use crate::url::decode_component;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Extensions treated as playable video files (compared case-insensitively)
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "mov", "wmv", "webm", "mpg", "mpeg",
];

fn season_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bseason(?:\b|[\s._-]*\d)").expect("valid season token regex"))
}

fn season_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bseason[\s._-]*(\d+)").expect("valid season number regex"))
}

/// Lowercases and keeps only alphanumeric characters
///
/// Two names that differ only in case, spacing or punctuation normalize to
/// the same string, which is what the dedup index and [`stable_id`] compare.
///
/// [`stable_id`]: crate::catalog::stable_id
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Returns true if the file name ends in a known video extension
pub fn has_video_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => VIDEO_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// Strips a trailing video extension, leaving other names untouched
pub fn strip_video_extension(name: &str) -> &str {
    if has_video_extension(name) {
        name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
    } else {
        name
    }
}

pub fn is_sample(name: &str) -> bool {
    name.to_lowercase().contains("sample")
}

/// Decoded name of the last path segment of a folder or file URL
pub fn folder_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(decode_component)
        .unwrap_or_default()
}

/// Human-readable name for a file link
///
/// Uses the anchor text when it is usable. Listings truncate long names
/// (`Very.Long.Name..>` or `Very.Long.Name…`), in which case the decoded
/// last segment of the href is used instead.
pub fn display_name(link_text: &str, url: &Url) -> String {
    let text = decode_component(link_text.trim());
    let text = text.trim();

    let source = if text.is_empty() || is_truncated(text) {
        folder_name(url)
    } else {
        text.to_string()
    };

    strip_video_extension(source.trim()).trim().to_string()
}

fn is_truncated(text: &str) -> bool {
    text.ends_with("..>") || text.ends_with('…') || text.ends_with("...")
}

/// Returns true if a folder name looks like a season folder
pub fn is_season_folder(name: &str) -> bool {
    season_token_regex().is_match(name)
}

/// `"Season N"` for the deepest season marker in a decoded path, `"Season 1"` otherwise
pub fn season_label(decoded_path: &str) -> String {
    let number = season_number_regex()
        .captures_iter(decoded_path)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .last()
        .unwrap_or(1);

    format!("Season {}", number)
}
