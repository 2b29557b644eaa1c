//! Scheduler for managing the crawl frontier and pacing
//!
//! This module handles:
//! - FIFO frontier management for folders to crawl
//! - Deduplication of folders by their decoded key
//! - The fixed delay before every request to the remote server
//! - The cooldown after the server signals rate limiting

use crate::config::CrawlerConfig;
use crate::url::folder_key;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// A folder queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The folder to fetch
    pub url: Url,

    /// Index of the crawl target this folder belongs to
    pub target: usize,

    /// Folders between the target root and this one
    pub depth: u32,

    /// How many times this folder has been answered with a rate limit
    pub rate_limited: u32,
}

impl QueuedUrl {
    pub fn new(url: Url, target: usize, depth: u32) -> Self {
        Self {
            url,
            target,
            depth,
            rate_limited: 0,
        }
    }
}

/// Scheduler manages the frontier queue and request pacing
///
/// There is never more than one request in flight, so pacing is a plain
/// sleep before each fetch rather than per-host bookkeeping.
#[derive(Debug)]
pub struct Scheduler {
    /// Folders waiting to be fetched, in discovery order
    frontier: VecDeque<QueuedUrl>,

    /// Keys of every folder ever enqueued during this run
    seen: HashSet<String>,

    request_delay: Duration,
    cooldown: Duration,
    requests_made: u64,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            request_delay: Duration::from_millis(config.request_delay),
            cooldown: Duration::from_millis(config.rate_limit_cooldown),
            requests_made: 0,
        }
    }

    /// Adds a folder to the back of the frontier
    ///
    /// Returns false if the folder was already enqueued during this run.
    pub fn add_to_frontier(&mut self, queued: QueuedUrl) -> bool {
        if !self.seen.insert(folder_key(&queued.url)) {
            return false;
        }

        self.frontier.push_back(queued);
        true
    }

    /// Puts a rate-limited folder back at the front of the frontier
    pub fn requeue_front(&mut self, mut queued: QueuedUrl) {
        queued.rate_limited += 1;
        tracing::debug!(
            "Requeueing {} (rate limited {} times)",
            queued.url,
            queued.rate_limited
        );
        self.frontier.push_front(queued);
    }

    /// Takes the next folder to process
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        self.frontier.pop_front()
    }

    /// Waits the configured delay before a request
    pub async fn wait_turn(&mut self) {
        tokio::time::sleep(self.request_delay).await;
        self.requests_made += 1;
    }

    /// Waits out a rate limit signal from the server
    pub async fn cool_down(&self) {
        tracing::warn!("Rate limited, cooling down for {:?}", self.cooldown);
        tokio::time::sleep(self.cooldown).await;
    }

    /// Returns the number of folders in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Number of requests paced so far
    pub fn requests_made(&self) -> u64 {
        self.requests_made
    }
}
