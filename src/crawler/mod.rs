//! Crawler module for walking directory listings
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and outcome classification
//! - Listing parsing and link extraction
//! - Splitting links into folders and playable files
//! - Frontier management and request pacing
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod target;

pub use classifier::{classify_links, ClassifiedLinks, SizeLimits};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{parse_html, parse_size, Link, ParsedPage};
pub use scheduler::{QueuedUrl, Scheduler};
pub use target::{CrawlMode, CrawlTarget};
