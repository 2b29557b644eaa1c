//! In-memory dedup index over the catalog
//!
//! The memory bank is never persisted on its own. It is rebuilt from the
//! loaded catalog at startup and updated as entries are added, so restarting
//! a run always sees exactly what the catalog files say.

use crate::catalog::model::{Catalog, EpisodeEntry, MovieEntry, SeriesEntry};
use crate::catalog::naming::normalize_name;
use crate::url::folder_key;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Sets of already-cataloged folders, names, files and series
#[derive(Debug, Clone, Default)]
pub struct MemoryBank {
    /// Decoded keys of folders that produced a movie
    known_folders: HashSet<String>,

    /// Normalized movie names and movie folder names
    known_names: HashSet<String>,

    /// Playable file URLs already recorded as a movie or an episode
    known_files: HashSet<String>,

    /// Stable IDs of recorded series
    known_series: HashSet<u64>,

    /// Highest episode ordinal recorded per series
    last_ordinal: HashMap<u64, u32>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index from a loaded catalog
    ///
    /// Target roots never contribute a folder name, otherwise a movie stored
    /// loose in the root would mark the root itself as a known name.
    pub fn rebuild(catalog: &Catalog, roots: &[Url]) -> Self {
        let root_keys: HashSet<String> = roots.iter().map(folder_key).collect();
        let mut memory = Self::new();

        for movie in &catalog.movies {
            memory.remember_movie(movie, !root_keys.contains(&movie.folder));
        }

        for series in &catalog.series {
            memory.remember_series(series);
        }

        for episode in &catalog.episodes {
            memory.remember_episode(episode);
        }

        tracing::debug!(
            "Memory rebuilt: {} folders, {} names, {} files, {} series",
            memory.known_folders.len(),
            memory.known_names.len(),
            memory.known_files.len(),
            memory.known_series.len()
        );

        memory
    }

    /// Records a movie; `own_folder` is false for loose files in a target root
    pub fn remember_movie(&mut self, movie: &MovieEntry, own_folder: bool) {
        self.known_files.insert(movie.url.clone());
        self.insert_name(&movie.name);

        if own_folder {
            self.known_folders.insert(movie.folder.clone());
            self.insert_name(key_folder_name(&movie.folder));
        }
    }

    pub fn remember_series(&mut self, series: &SeriesEntry) {
        self.known_series.insert(series.id);
    }

    pub fn remember_episode(&mut self, episode: &EpisodeEntry) {
        self.known_files.insert(episode.url.clone());

        let ordinal = episode
            .id
            .rsplit_once('-')
            .and_then(|(_, ordinal)| ordinal.parse::<u32>().ok());

        let last = self.last_ordinal.entry(episode.series_id).or_insert(0);
        *last = match ordinal {
            Some(ordinal) => (*last).max(ordinal),
            None => *last + 1,
        };
    }

    /// Marks a folder as handled without recording a movie for it
    pub fn remember_folder(&mut self, folder: &Url) {
        self.known_folders.insert(folder_key(folder));
    }

    pub fn knows_folder(&self, folder: &Url) -> bool {
        self.known_folders.contains(&folder_key(folder))
    }

    /// Compares by normalized name; names that normalize to nothing are never known
    pub fn knows_name(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        !normalized.is_empty() && self.known_names.contains(&normalized)
    }

    pub fn knows_file(&self, url: &str) -> bool {
        self.known_files.contains(url)
    }

    pub fn knows_series(&self, id: u64) -> bool {
        self.known_series.contains(&id)
    }

    /// Ordinal the next episode of a series should use
    pub fn next_episode_ordinal(&self, series_id: u64) -> u32 {
        self.last_ordinal.get(&series_id).copied().unwrap_or(0) + 1
    }

    fn insert_name(&mut self, name: &str) {
        let normalized = normalize_name(name);
        if !normalized.is_empty() {
            self.known_names.insert(normalized);
        }
    }
}

/// Last segment of a decoded folder key
fn key_folder_name(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}
