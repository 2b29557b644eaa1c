//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch listing pages
//! - Reporting redirects instead of following them, so every hop can be
//!   checked against the target root before it is requested
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single listing
pub const MAX_REDIRECTS: u32 = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// URL the body was served from
        final_url: Url,
        /// Page body content
        body: String,
    },

    /// The server redirected elsewhere; not followed automatically
    Redirect {
        /// Absolute redirect target
        location: Url,
    },

    /// The server asked us to slow down (HTTP 429)
    RateLimited,

    /// The URL serves a media file, not a listing
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Any status other than 200, 3xx with a Location, or 429
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::UserAgentConfig;
/// use reel_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ReelHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a listing page
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 with a media Content-Type | ContentMismatch |
/// | HTTP 200 | Success |
/// | HTTP 3xx with a Location | Redirect |
/// | HTTP 429 | RateLimited |
/// | Any other HTTP status, including other 2xx | HttpError |
/// | Timeout, refused connection | NetworkError |
///
/// There are no retries here; the coordinator decides what to do with each
/// outcome.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return FetchResult::RateLimited;
    }

    if status.is_redirection() {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| url.join(location).ok());

        if let Some(location) = location {
            return FetchResult::Redirect { location };
        }
    }

    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if is_media_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().clone();

    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Content types that mean the URL is a file rather than a listing
fn is_media_content_type(content_type: &str) -> bool {
    content_type.starts_with("video/")
        || content_type.starts_with("audio/")
        || content_type.starts_with("application/octet-stream")
}
