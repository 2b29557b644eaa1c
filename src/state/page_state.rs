/// Page state definitions for tracking crawl progress
///
/// This module defines the outcome of every folder taken off the frontier.
use std::fmt;

/// Represents what happened to a folder taken off the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Listing was fetched, classified and cataloged
    Processed,

    // ===== Skip States =====
    /// Folder is already cataloged and was not fetched
    Skipped,

    /// Folder lies outside its target root and was discarded
    OutOfScope,

    /// Folder exceeds the maximum crawl depth
    DepthExceeded,

    // ===== Transient States =====
    /// Server answered HTTP 429; the folder was put back in the frontier
    RateLimited,

    // ===== Error States =====
    /// Folder was rate limited more times than allowed and abandoned
    RetryLimitHit,

    /// Fetch failed (HTTP error, network error, redirect out of scope)
    Failed,

    /// URL serves a media file instead of a listing
    ContentMismatch,
}

impl PageState {
    /// Short machine-readable name, used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Skipped => "skipped",
            Self::OutOfScope => "out_of_scope",
            Self::DepthExceeded => "depth_exceeded",
            Self::RateLimited => "rate_limited",
            Self::RetryLimitHit => "retry_limit_hit",
            Self::Failed => "failed",
            Self::ContentMismatch => "content_mismatch",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
