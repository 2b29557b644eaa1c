//! External metadata lookup seam
//!
//! After an entry has been assigned its stable ID, the crawler may ask a
//! lookup service for a poster, rating, genre and display title. The lookup
//! enriches the entry only; it never changes the entry's identity.

use crate::catalog::model::Category;
use async_trait::async_trait;

/// Descriptive data returned by a lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalMetadata {
    pub display_name: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f32>,
    pub genre: Option<String>,
}

/// A source of descriptive metadata for movies and series
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Looks up a name; `None` when nothing is known or the lookup failed
    async fn lookup(&self, name: &str, category: Category) -> Option<ExternalMetadata>;
}

/// Lookup that never returns anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

#[async_trait]
impl MetadataLookup for NoMetadata {
    async fn lookup(&self, _name: &str, _category: Category) -> Option<ExternalMetadata> {
        None
    }
}
