//! Output module for crawl and catalog reporting
//!
//! This module handles:
//! - Recording per-run crawl statistics
//! - Summarizing the catalog on disk for `--stats`

pub mod stats;

pub use stats::{
    catalog_statistics, load_statistics, print_statistics, CatalogStatistics, CrawlStatistics,
};
