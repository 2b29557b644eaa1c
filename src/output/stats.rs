//! Crawl and catalog statistics
//!
//! This module provides the counters collected during a run and a summary
//! of what the catalog on disk holds, with functions to display both.

use crate::catalog::{Catalog, CatalogStorage, StorageResult};
use crate::state::PageState;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters collected during one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Folders taken off the frontier, by outcome
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// Requests sent to the remote server
    pub requests_made: u64,

    /// Discovered links discarded for pointing outside their target root
    pub links_out_of_scope: u64,

    /// Discovered folders not enqueued because they are already cataloged
    pub folders_known: u64,

    pub new_movies: u64,
    pub new_series: u64,
    pub new_episodes: u64,

    /// Number of times the catalog was written out
    pub flushes: u64,

    pub duration: Duration,
}

impl CrawlStatistics {
    pub fn record(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total folders taken off the frontier
    pub fn total_pages(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn new_entries(&self) -> u64 {
        self.new_movies + self.new_series + self.new_episodes
    }

    /// Logs a one-screen summary of the run
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished in {:?}: {} folders, {} requests, {} new movies, {} new series, {} new episodes",
            self.duration,
            self.total_pages(),
            self.requests_made,
            self.new_movies,
            self.new_series,
            self.new_episodes
        );

        for (state, count) in &self.pages_by_state {
            tracing::info!("  {}: {}", state, count);
        }

        if self.links_out_of_scope > 0 {
            tracing::info!("  links outside target roots: {}", self.links_out_of_scope);
        }
    }
}

/// Summary of the catalog on disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStatistics {
    pub movies: u64,
    pub series: u64,
    pub episodes: u64,

    /// Movie count per target label
    pub movies_by_label: BTreeMap<String, u64>,

    /// Series count per target label
    pub series_by_label: BTreeMap<String, u64>,

    /// Series with the most episodes, largest first
    pub largest_series: Vec<(String, u64)>,

    /// Episodes whose series is missing from the series section
    pub orphan_episodes: u64,
}

/// Number of series listed in `largest_series`
const LARGEST_SERIES_SHOWN: usize = 5;

/// Loads the catalog through `storage` and summarizes it
pub fn load_statistics(storage: &dyn CatalogStorage) -> StorageResult<CatalogStatistics> {
    Ok(catalog_statistics(&storage.load()?))
}

/// Summarizes an in-memory catalog
pub fn catalog_statistics(catalog: &Catalog) -> CatalogStatistics {
    let mut stats = CatalogStatistics {
        movies: catalog.movies.len() as u64,
        series: catalog.series.len() as u64,
        episodes: catalog.episodes.len() as u64,
        ..CatalogStatistics::default()
    };

    for movie in &catalog.movies {
        *stats.movies_by_label.entry(movie.category.clone()).or_insert(0) += 1;
    }

    let mut episode_counts: BTreeMap<u64, u64> = BTreeMap::new();
    for episode in &catalog.episodes {
        *episode_counts.entry(episode.series_id).or_insert(0) += 1;
    }

    for series in &catalog.series {
        *stats.series_by_label.entry(series.category.clone()).or_insert(0) += 1;
    }

    let mut largest: Vec<(String, u64)> = episode_counts
        .iter()
        .filter_map(|(id, count)| {
            catalog
                .series_by_id(*id)
                .map(|series| (series.name.clone(), *count))
        })
        .collect();
    largest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    largest.truncate(LARGEST_SERIES_SHOWN);
    stats.largest_series = largest;

    stats.orphan_episodes = episode_counts
        .iter()
        .filter(|(id, _)| catalog.series_by_id(**id).is_none())
        .map(|(_, count)| count)
        .sum();

    stats
}

/// Prints catalog statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Movies: {}", stats.movies);
    println!("  Series: {}", stats.series);
    println!("  Episodes: {}", stats.episodes);
    println!();

    if !stats.movies_by_label.is_empty() {
        println!("Movies by Category:");
        for (label, count) in &stats.movies_by_label {
            println!("  {}: {}", label, count);
        }
        println!();
    }

    if !stats.series_by_label.is_empty() {
        println!("Series by Category:");
        for (label, count) in &stats.series_by_label {
            println!("  {}: {}", label, count);
        }
        println!();
    }

    if !stats.largest_series.is_empty() {
        println!("Largest Series:");
        for (name, count) in &stats.largest_series {
            println!("  {}: {} episodes", name, count);
        }
        println!();
    }

    if stats.orphan_episodes > 0 {
        println!(
            "Warning: {} episodes reference a series that is not in the catalog",
            stats.orphan_episodes
        );
    }
}
