//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Loading the catalog and rebuilding the dedup index
//! - Seeding the frontier with the active target roots
//! - Coordinating fetching, parsing, classification and cataloging
//! - Rate limit cooldowns and retries
//! - Periodic and final catalog flushes

use crate::catalog::{
    policy_for, Addition, Catalog, CatalogStorage, Category, ClassificationPolicy,
    FolderListing, JsonStorage, MemoryBank, MetadataLookup, NoMetadata,
};
use crate::config::Config;
use crate::crawler::classifier::{classify_links, SizeLimits};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, MAX_REDIRECTS};
use crate::crawler::parser::{parse_html, Link};
use crate::crawler::scheduler::{QueuedUrl, Scheduler};
use crate::crawler::target::{CrawlMode, CrawlTarget};
use crate::output::CrawlStatistics;
use crate::state::PageState;
use crate::HarvestError;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    mode: CrawlMode,
    targets: Vec<CrawlTarget>,

    /// One policy per target, same index
    policies: Vec<Box<dyn ClassificationPolicy>>,

    scheduler: Scheduler,
    client: Client,
    storage: Box<dyn CatalogStorage + Send + Sync>,
    catalog: Catalog,
    memory: MemoryBank,
    metadata: Arc<dyn MetadataLookup>,
    size_limits: SizeLimits,
    stats: CrawlStatistics,

    /// Entries added since the last flush
    unflushed: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Loads the catalog from the configured paths, rebuilds the dedup index
    /// from it and seeds the frontier with the root of every target whose
    /// category is part of `mode`.
    ///
    /// # Errors
    ///
    /// Fails if a target root is not a valid URL or the HTTP client cannot
    /// be built.
    pub fn new(config: Config, mode: CrawlMode) -> Result<Self, HarvestError> {
        let storage = JsonStorage::from_config(&config.output);
        Self::with_storage(config, mode, Box::new(storage))
    }

    /// Creates a coordinator backed by the given storage
    pub fn with_storage(
        config: Config,
        mode: CrawlMode,
        storage: Box<dyn CatalogStorage + Send + Sync>,
    ) -> Result<Self, HarvestError> {
        let targets = config
            .targets
            .iter()
            .map(CrawlTarget::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = storage.load()?;
        let roots: Vec<Url> = targets.iter().map(|target| target.root.clone()).collect();
        let memory = MemoryBank::rebuild(&catalog, &roots);

        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;

        let mut scheduler = Scheduler::new(&config.crawler);
        for (index, target) in targets.iter().enumerate() {
            if mode.includes(target.category) {
                tracing::info!(
                    "Seeding {} target '{}' at {}",
                    target.category,
                    target.label,
                    target.root
                );
                scheduler.add_to_frontier(QueuedUrl::new(target.root.clone(), index, 0));
            }
        }

        if scheduler.is_empty() {
            tracing::warn!("No targets match mode {:?}, nothing to crawl", mode);
        }

        let policies = targets
            .iter()
            .map(|target| policy_for(target.category))
            .collect();

        Ok(Self {
            size_limits: SizeLimits::from_config(&config.filter),
            config: Arc::new(config),
            mode,
            targets,
            policies,
            scheduler,
            client,
            storage,
            catalog,
            memory,
            metadata: Arc::new(NoMetadata),
            stats: CrawlStatistics::default(),
            unflushed: 0,
        })
    }

    /// Replaces the metadata lookup used for new movies and series
    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataLookup>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Takes folders from the frontier in order
    /// 2. Discards folders that are out of scope, too deep or already cataloged
    /// 3. Fetches listings one request at a time, following in-scope redirects
    /// 4. Catalogs new files and enqueues sub-folders
    /// 5. Flushes the catalog periodically and once at the end
    ///
    /// Per-folder failures are logged and the crawl moves on. Only a failure
    /// to write the catalog aborts the run.
    pub async fn run(&mut self) -> Result<CrawlStatistics, HarvestError> {
        tracing::info!(
            "Starting crawl: {} folders queued, {} movies / {} series / {} episodes already cataloged",
            self.scheduler.frontier_size(),
            self.catalog.movies.len(),
            self.catalog.series.len(),
            self.catalog.episodes.len()
        );
        if self.catalog.is_empty() {
            tracing::info!("Catalog is empty, every folder found is new");
        }

        let mut pages_crawled: u64 = 0;
        let start_time = Instant::now();

        while let Some(queued) = self.scheduler.next_url() {
            let url = queued.url.clone();
            let state = self.process_url(queued).await?;
            tracing::debug!("{} -> {}", url, state);

            self.stats.record(state);
            pages_crawled += 1;

            // Progress reporting every 10 folders
            if pages_crawled % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = pages_crawled as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} folders handled, {} in frontier, {:.2} folders/sec",
                    pages_crawled,
                    self.scheduler.frontier_size(),
                    rate
                );
            }
        }

        tracing::info!("Frontier is empty, crawl complete");
        self.flush()?;

        self.stats.requests_made = self.scheduler.requests_made();
        self.stats.duration = start_time.elapsed();
        self.stats.log_summary();

        Ok(self.stats.clone())
    }

    /// Processes a single folder taken off the frontier
    async fn process_url(&mut self, queued: QueuedUrl) -> Result<PageState, HarvestError> {
        let target = self.targets[queued.target].clone();

        if !target.contains(&queued.url) {
            tracing::debug!("Discarding {} outside {}", queued.url, target.root);
            return Ok(PageState::OutOfScope);
        }

        if let Some(max_depth) = self.config.crawler.max_depth {
            if queued.depth > max_depth {
                tracing::debug!("Not descending into {} (depth {})", queued.url, queued.depth);
                return Ok(PageState::DepthExceeded);
            }
        }

        if !self.policies[queued.target].should_visit(&target, &queued.url, &self.memory) {
            return Ok(PageState::Skipped);
        }

        let mut current = queued.url.clone();
        let mut redirects = 0;

        loop {
            self.scheduler.wait_turn().await;
            tracing::debug!("Fetching {}", current);

            match fetch_url(&self.client, &current).await {
                FetchResult::Success { final_url, body } => {
                    self.handle_listing(&target, queued.target, &final_url, &body)
                        .await?;
                    return Ok(PageState::Processed);
                }

                FetchResult::Redirect { location } => {
                    if !target.contains(&location) {
                        tracing::warn!(
                            "{} redirects to {} outside {}, abandoning",
                            current,
                            location,
                            target.root
                        );
                        return Ok(PageState::Failed);
                    }

                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        tracing::warn!("Too many redirects for {}", queued.url);
                        return Ok(PageState::Failed);
                    }

                    tracing::debug!("{} redirects to {}", current, location);
                    current = location;
                }

                FetchResult::RateLimited => {
                    if let Some(max_retries) = self.config.crawler.max_rate_limit_retries {
                        if queued.rate_limited >= max_retries {
                            tracing::warn!(
                                "Giving up on {} after {} rate limited attempts",
                                queued.url,
                                queued.rate_limited + 1
                            );
                            return Ok(PageState::RetryLimitHit);
                        }
                    }

                    self.scheduler.cool_down().await;
                    self.scheduler.requeue_front(queued);
                    return Ok(PageState::RateLimited);
                }

                FetchResult::ContentMismatch { content_type } => {
                    tracing::debug!("{} serves {}, not a listing", current, content_type);
                    return Ok(PageState::ContentMismatch);
                }

                FetchResult::HttpError { status_code } => {
                    tracing::warn!("HTTP {} for {}", status_code, current);
                    return Ok(PageState::Failed);
                }

                FetchResult::NetworkError { error } => {
                    tracing::warn!("Failed to fetch {}: {}", current, error);
                    return Ok(PageState::Failed);
                }
            }
        }
    }

    /// Catalogs the files of a fetched listing and enqueues its sub-folders
    async fn handle_listing(
        &mut self,
        target: &CrawlTarget,
        target_index: usize,
        page_url: &Url,
        body: &str,
    ) -> Result<(), HarvestError> {
        let parsed = parse_html(body, page_url);
        if let Some(title) = &parsed.title {
            tracing::trace!("Listing title: {}", title);
        }

        let classified = classify_links(page_url, parsed.links);
        tracing::debug!(
            "{}: {} folders, {} files",
            page_url,
            classified.folders.len(),
            classified.files.len()
        );

        let mut files: Vec<Link> = Vec::with_capacity(classified.files.len());
        for file in classified.files {
            if !target.contains(&file.url) {
                self.stats.links_out_of_scope += 1;
                tracing::debug!("Ignoring file {} outside {}", file.url, target.root);
            } else if self.size_limits.admits(&file) {
                files.push(file);
            } else {
                tracing::debug!("Ignoring {} ({:?} bytes) outside size limits", file.url, file.size);
            }
        }

        let listing = FolderListing {
            target,
            folder: page_url,
            files: &files,
            seen_at: Utc::now(),
        };
        let additions = self.policies[target_index].catalog_folder(
            &listing,
            &mut self.catalog,
            &mut self.memory,
        );
        self.record_additions(&additions).await?;

        for folder in classified.folders {
            self.enqueue(target, target_index, folder.url);
        }

        Ok(())
    }

    /// Adds a discovered folder to the frontier if it is in scope and not already cataloged
    fn enqueue(&mut self, target: &CrawlTarget, target_index: usize, url: Url) {
        if !target.contains(&url) {
            self.stats.links_out_of_scope += 1;
            tracing::debug!("Ignoring folder {} outside {}", url, target.root);
            return;
        }

        if !self.policies[target_index].should_visit(target, &url, &self.memory) {
            self.stats.folders_known += 1;
            return;
        }

        let depth = target.depth_of(&url);
        self.scheduler
            .add_to_frontier(QueuedUrl::new(url, target_index, depth));
    }

    /// Counts new entries, enriches them with metadata and flushes when due
    async fn record_additions(&mut self, additions: &[Addition]) -> Result<(), HarvestError> {
        for addition in additions {
            match *addition {
                Addition::Movie(index) => {
                    self.stats.new_movies += 1;
                    let name = self.catalog.movies[index].name.clone();
                    if let Some(metadata) = self.metadata.lookup(&name, Category::Movie).await {
                        self.catalog.movies[index].apply_metadata(metadata);
                    }
                }
                Addition::Series(index) => {
                    self.stats.new_series += 1;
                    let name = self.catalog.series[index].name.clone();
                    if let Some(metadata) = self.metadata.lookup(&name, Category::Series).await {
                        self.catalog.series[index].apply_metadata(metadata);
                    }
                }
                Addition::Episode(_) => self.stats.new_episodes += 1,
            }
        }

        self.unflushed += additions.len();
        if self.unflushed >= self.config.crawler.flush_every {
            self.flush()?;
        }

        Ok(())
    }

    /// Writes the sections of the active categories to storage
    fn flush(&mut self) -> Result<(), HarvestError> {
        if self.mode.includes(Category::Movie) {
            self.storage.save_movies(&self.catalog.movies)?;
        }

        if self.mode.includes(Category::Series) {
            self.storage
                .save_series(&self.catalog.series, &self.catalog.episodes)?;
        }

        tracing::info!(
            "Catalog saved: {} movies, {} series, {} episodes",
            self.catalog.movies.len(),
            self.catalog.series.len(),
            self.catalog.episodes.len()
        );

        self.unflushed = 0;
        self.stats.flushes += 1;
        Ok(())
    }
}

/// Runs a complete crawl operation
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::load_config;
/// use reel_harvest::crawler::{run_crawl, CrawlMode};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = run_crawl(config, CrawlMode::Both).await?;
/// println!("{} new movies", stats.new_movies);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, mode: CrawlMode) -> Result<CrawlStatistics, HarvestError> {
    let mut coordinator = Coordinator::new(config, mode)?;
    coordinator.run().await
}
