//! Splits listing links into sub-folders and playable files
//!
//! Anything that is neither is dropped here: navigation artifacts such as
//! the parent-directory link and sort-order query links, links back to the
//! page itself, and files that are not video.

use crate::catalog::{folder_name, has_video_extension};
use crate::config::FilterConfig;
use crate::crawler::parser::Link;
use std::collections::HashMap;
use url::Url;

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// Links of one listing page, by kind
#[derive(Debug, Clone, Default)]
pub struct ClassifiedLinks {
    pub folders: Vec<Link>,
    pub files: Vec<Link>,
}

/// Classifies the links of a listing page
///
/// Duplicate links to the same URL (icon and text anchors of one row) are
/// merged, keeping the first anchor that carries text. Listing order is
/// preserved.
pub fn classify_links(page_url: &Url, links: Vec<Link>) -> ClassifiedLinks {
    let mut unique: Vec<Link> = Vec::with_capacity(links.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for link in links {
        if is_navigation(page_url, &link) {
            continue;
        }

        match positions.get(link.url.as_str()) {
            Some(&index) => {
                let existing = &mut unique[index];
                if existing.text.is_empty() && !link.text.is_empty() {
                    existing.text = link.text;
                }
                if existing.size.is_none() {
                    existing.size = link.size;
                }
            }
            None => {
                positions.insert(link.url.to_string(), unique.len());
                unique.push(link);
            }
        }
    }

    let mut classified = ClassifiedLinks::default();
    for link in unique {
        if is_folder(&link.url) {
            classified.folders.push(link);
        } else if is_video_file(&link.url) {
            classified.files.push(link);
        }
    }

    classified
}

/// Parent links, sort links and self links
fn is_navigation(page_url: &Url, link: &Link) -> bool {
    let href = link.href.as_str();
    if matches!(href, "../" | ".." | "./" | "." | "/") || href.starts_with('?') {
        return true;
    }

    if link.text.eq_ignore_ascii_case("parent directory") {
        return true;
    }

    if link.url.query().is_some() {
        return true;
    }

    // the page itself, or any folder above it
    link.url.host_str() == page_url.host_str()
        && link.url.port_or_known_default() == page_url.port_or_known_default()
        && page_url.path().starts_with(link.url.path())
        && link.url.path().ends_with('/')
}

fn is_folder(url: &Url) -> bool {
    url.path().ends_with('/')
}

fn is_video_file(url: &Url) -> bool {
    has_video_extension(&folder_name(url))
}

/// Optional size bounds applied to files whose listing shows a size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeLimits {
    min_bytes: Option<u64>,
    max_bytes: Option<u64>,
}

impl SizeLimits {
    pub fn from_config(config: &FilterConfig) -> Self {
        let to_bytes = |gb: f64| (gb * BYTES_PER_GB) as u64;
        Self {
            min_bytes: config.min_size_gb.map(to_bytes),
            max_bytes: config.max_size_gb.map(to_bytes),
        }
    }

    /// Files without a known size are always admitted
    pub fn admits(&self, link: &Link) -> bool {
        let Some(size) = link.size else {
            return true;
        };

        self.min_bytes.map_or(true, |min| size >= min)
            && self.max_bytes.map_or(true, |max| size <= max)
    }
}
