//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the outcome of each folder taken off the frontier (processed, skipped, failed, etc.)

mod page_state;

pub use page_state::PageState;
