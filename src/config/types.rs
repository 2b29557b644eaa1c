use crate::catalog::Category;
use serde::Deserialize;

/// Main configuration structure for Reel-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay slept before every request (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Cooldown slept after an HTTP 429 before the URL is retried (milliseconds)
    #[serde(rename = "rate-limit-cooldown")]
    pub rate_limit_cooldown: u64,

    /// Timeout for a single GET request (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Number of newly added catalog items between periodic flushes
    #[serde(rename = "flush-every")]
    pub flush_every: usize,

    /// Optional cap on folder depth below a target root
    #[serde(default, rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Optional cap on rate-limit retries for a single URL
    #[serde(default, rename = "max-rate-limit-retries")]
    pub max_rate_limit_retries: Option<u32>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Catalog file locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "movies-path")]
    pub movies_path: String,

    #[serde(rename = "series-path")]
    pub series_path: String,

    #[serde(rename = "episodes-path")]
    pub episodes_path: String,
}

/// Size bounds applied to files whose listing shows a size
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default, rename = "min-size-gb")]
    pub min_size_gb: Option<f64>,

    #[serde(default, rename = "max-size-gb")]
    pub max_size_gb: Option<f64>,
}

/// A category root to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Movie or series policy
    pub category: Category,

    /// Root URL of the listing; everything outside it is out of scope
    pub root: String,

    /// Category label written into catalog entries
    #[serde(default)]
    pub label: Option<String>,
}
