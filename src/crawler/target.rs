//! Crawl targets and run modes

use crate::catalog::Category;
use crate::config::TargetEntry;
use crate::url::{depth_below, folder_key, is_within_root, normalize_root};
use crate::UrlResult;
use url::Url;

/// A root folder on the remote server and the category it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub category: Category,

    /// Normalized root, always ending in `/`
    pub root: Url,

    /// Value written to `category_id` of every entry from this target
    pub label: String,
}

impl CrawlTarget {
    pub fn new(category: Category, root: &str, label: Option<&str>) -> UrlResult<Self> {
        Ok(Self {
            category,
            root: normalize_root(root)?,
            label: label
                .map(str::to_string)
                .unwrap_or_else(|| category.default_label().to_string()),
        })
    }

    pub fn from_entry(entry: &TargetEntry) -> UrlResult<Self> {
        Self::new(entry.category, &entry.root, entry.label.as_deref())
    }

    /// Whether a URL lies at or below this target's root
    pub fn contains(&self, url: &Url) -> bool {
        is_within_root(&self.root, url)
    }

    pub fn is_root(&self, url: &Url) -> bool {
        folder_key(url) == folder_key(&self.root)
    }

    /// Number of folders between the root and `url`
    pub fn depth_of(&self, url: &Url) -> u32 {
        depth_below(&self.root, url)
    }
}

/// Which categories a run crawls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    Movies,
    Series,
    #[default]
    Both,
}

impl CrawlMode {
    pub fn includes(&self, category: Category) -> bool {
        match self {
            Self::Movies => category == Category::Movie,
            Self::Series => category == Category::Series,
            Self::Both => true,
        }
    }
}
