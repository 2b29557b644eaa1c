//! Catalog of discovered media
//!
//! The catalog is the durable product of a crawl: three JSON sections
//! (movies, series, episodes) that grow monotonically across runs. This
//! module holds the record types, the naming and identity rules, the
//! in-memory dedup index rebuilt from disk at startup, and the per-category
//! policies that decide what to crawl and what to record.

mod identity;
mod memory;
mod metadata;
mod model;
mod naming;
mod policy;
mod storage;

pub use identity::{stable_id, ID_MODULUS};
pub use memory::MemoryBank;
pub use metadata::{ExternalMetadata, MetadataLookup, NoMetadata};
pub use model::{Catalog, Category, EpisodeEntry, MovieEntry, SeriesEntry};
pub use naming::{
    display_name, folder_name, has_video_extension, is_sample, is_season_folder, normalize_name,
    season_label, strip_video_extension, VIDEO_EXTENSIONS,
};
pub use policy::{
    policy_for, Addition, ClassificationPolicy, FolderListing, MoviePolicy, SeriesPolicy,
};
pub use storage::{CatalogStorage, JsonStorage, StorageError, StorageResult};
