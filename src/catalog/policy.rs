//! Per-category classification policies
//!
//! A policy answers two questions for the crawl loop: whether a folder is
//! worth fetching at all, and which catalog entries a fetched folder's files
//! produce. Movie targets skip anything already cataloged and record one
//! entry per folder. Series targets always descend, because new episodes
//! appear inside folders that are already known.

use crate::catalog::identity::stable_id;
use crate::catalog::memory::MemoryBank;
use crate::catalog::model::{Catalog, Category, EpisodeEntry, MovieEntry, SeriesEntry};
use crate::catalog::naming::{display_name, folder_name, is_sample, is_season_folder, season_label};
use crate::crawler::{CrawlTarget, Link};
use crate::url::{ancestors_within, decode_component, folder_key};
use chrono::{DateTime, Utc};
use std::fmt;
use url::Url;

/// The playable files found in one fetched folder
#[derive(Debug)]
pub struct FolderListing<'a> {
    pub target: &'a CrawlTarget,

    /// Folder URL after redirects
    pub folder: &'a Url,

    /// In-scope video files, in listing order
    pub files: &'a [Link],

    pub seen_at: DateTime<Utc>,
}

/// An entry appended to the catalog, by index into its section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addition {
    Movie(usize),
    Series(usize),
    Episode(usize),
}

/// Decides what to crawl and what to record for one category
pub trait ClassificationPolicy: Send + Sync + fmt::Debug {
    fn category(&self) -> Category;

    /// Whether a folder should be fetched given what is already cataloged
    fn should_visit(&self, target: &CrawlTarget, folder: &Url, memory: &MemoryBank) -> bool;

    /// Records new entries for a fetched folder and returns what was added
    fn catalog_folder(
        &self,
        listing: &FolderListing<'_>,
        catalog: &mut Catalog,
        memory: &mut MemoryBank,
    ) -> Vec<Addition>;
}

/// Returns the policy for a category
pub fn policy_for(category: Category) -> Box<dyn ClassificationPolicy> {
    match category {
        Category::Movie => Box::new(MoviePolicy),
        Category::Series => Box::new(SeriesPolicy),
    }
}

/// One movie per folder; known folders and names are never fetched again
#[derive(Debug, Clone, Copy, Default)]
pub struct MoviePolicy;

impl ClassificationPolicy for MoviePolicy {
    fn category(&self) -> Category {
        Category::Movie
    }

    fn should_visit(&self, target: &CrawlTarget, folder: &Url, memory: &MemoryBank) -> bool {
        if target.is_root(folder) {
            return true;
        }

        if memory.knows_folder(folder) {
            tracing::debug!("Skipping known folder {}", folder);
            return false;
        }

        if memory.knows_name(&folder_name(folder)) {
            tracing::debug!("Skipping folder with a known name {}", folder);
            return false;
        }

        // extras and sample sub-folders of a cataloged movie
        if let Some(ancestor) = ancestors_within(&target.root, folder)
            .iter()
            .find(|ancestor| memory.knows_folder(ancestor))
        {
            tracing::debug!("Skipping {} inside known folder {}", folder, ancestor);
            return false;
        }

        true
    }

    fn catalog_folder(
        &self,
        listing: &FolderListing<'_>,
        catalog: &mut Catalog,
        memory: &mut MemoryBank,
    ) -> Vec<Addition> {
        if listing.files.is_empty() {
            return Vec::new();
        }

        if listing.target.is_root(listing.folder) {
            return catalog_loose_movies(listing, catalog, memory);
        }

        if memory.knows_folder(listing.folder) {
            return Vec::new();
        }

        let candidates: Vec<&Link> = listing
            .files
            .iter()
            .filter(|file| !is_sample(&file_name(file)))
            .collect();

        let representative = match candidates.first() {
            Some(file) => *file,
            None => &listing.files[0],
        };

        let name = display_name(&representative.text, &representative.url);

        if memory.knows_file(representative.url.as_str()) || memory.knows_name(&name) {
            tracing::debug!(
                "{} duplicates an existing movie, marking folder as known",
                listing.folder
            );
            memory.remember_folder(listing.folder);
            return Vec::new();
        }

        let entry = MovieEntry {
            id: stable_id(&name),
            name,
            url: representative.url.to_string(),
            folder: folder_key(listing.folder),
            category: listing.target.label.clone(),
            image: String::new(),
            created_at: listing.seen_at,
            title: None,
            rating: None,
            genre: None,
        };

        tracing::info!("New movie: {} ({})", entry.name, entry.id);
        memory.remember_movie(&entry, true);
        catalog.movies.push(entry);

        vec![Addition::Movie(catalog.movies.len() - 1)]
    }
}

/// Files sitting directly in a movie root are independent movies
fn catalog_loose_movies(
    listing: &FolderListing<'_>,
    catalog: &mut Catalog,
    memory: &mut MemoryBank,
) -> Vec<Addition> {
    let mut additions = Vec::new();

    for file in listing.files {
        if is_sample(&file_name(file)) || memory.knows_file(file.url.as_str()) {
            continue;
        }

        let name = display_name(&file.text, &file.url);
        if memory.knows_name(&name) {
            continue;
        }

        let entry = MovieEntry {
            id: stable_id(&name),
            name,
            url: file.url.to_string(),
            folder: folder_key(listing.folder),
            category: listing.target.label.clone(),
            image: String::new(),
            created_at: listing.seen_at,
            title: None,
            rating: None,
            genre: None,
        };

        tracing::info!("New movie: {} ({})", entry.name, entry.id);
        memory.remember_movie(&entry, false);
        catalog.movies.push(entry);
        additions.push(Addition::Movie(catalog.movies.len() - 1));
    }

    additions
}

/// Series are always descended; new files become episodes of the show they sit in
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesPolicy;

impl ClassificationPolicy for SeriesPolicy {
    fn category(&self) -> Category {
        Category::Series
    }

    fn should_visit(&self, _target: &CrawlTarget, _folder: &Url, _memory: &MemoryBank) -> bool {
        true
    }

    fn catalog_folder(
        &self,
        listing: &FolderListing<'_>,
        catalog: &mut Catalog,
        memory: &mut MemoryBank,
    ) -> Vec<Addition> {
        if listing.files.is_empty() {
            return Vec::new();
        }

        if listing.target.is_root(listing.folder) {
            tracing::debug!(
                "Ignoring {} loose files in series root {}",
                listing.files.len(),
                listing.folder
            );
            return Vec::new();
        }

        let show_folder = show_folder(listing.folder);
        let show_name = folder_name(&show_folder);
        let series_id = stable_id(&show_name);
        let mut additions = Vec::new();

        if !memory.knows_series(series_id) {
            let entry = SeriesEntry {
                id: series_id,
                name: show_name,
                folder: folder_key(&show_folder),
                category: listing.target.label.clone(),
                image: String::new(),
                created_at: listing.seen_at,
                title: None,
                rating: None,
                genre: None,
            };

            tracing::info!("New series: {} ({})", entry.name, entry.id);
            memory.remember_series(&entry);
            catalog.series.push(entry);
            additions.push(Addition::Series(catalog.series.len() - 1));
        }

        let season = season_label(&decode_component(listing.folder.path()));

        for file in listing.files {
            if memory.knows_file(file.url.as_str()) {
                continue;
            }

            let ordinal = memory.next_episode_ordinal(series_id);
            let episode = EpisodeEntry {
                id: format!("{}-{}", series_id, ordinal),
                series_id,
                season: season.clone(),
                name: display_name(&file.text, &file.url),
                url: file.url.to_string(),
            };

            tracing::debug!("New episode: {} ({})", episode.name, episode.id);
            memory.remember_episode(&episode);
            catalog.episodes.push(episode);
            additions.push(Addition::Episode(catalog.episodes.len() - 1));
        }

        additions
    }
}

/// The folder that names the show: the parent of a season folder, else the folder itself
fn show_folder(folder: &Url) -> Url {
    if is_season_folder(&folder_name(folder)) {
        if let Ok(parent) = folder.join("..") {
            return parent;
        }
    }
    folder.clone()
}

fn file_name(link: &Link) -> String {
    folder_name(&link.url)
}
