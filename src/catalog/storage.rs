//! Catalog persistence as three JSON files
//!
//! Loading is forgiving about content: a missing file is an empty section,
//! and a file that does not parse is moved aside to `<path>.corrupt` and
//! treated as empty. A file that cannot be read at all is an error. Saving is strict: every write goes to a temporary sibling file
//! that is renamed over the target, so a crash never leaves a half-written
//! catalog behind, and any failure is returned to the caller.

use crate::catalog::model::{Catalog, EpisodeEntry, MovieEntry, SeriesEntry};
use crate::config::OutputConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing the catalog
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable home of the catalog sections
pub trait CatalogStorage {
    /// Loads all sections; missing or corrupt sections come back empty
    fn load(&self) -> StorageResult<Catalog>;

    /// Replaces the movies section
    fn save_movies(&self, movies: &[MovieEntry]) -> StorageResult<()>;

    /// Replaces the series and episodes sections
    fn save_series(&self, series: &[SeriesEntry], episodes: &[EpisodeEntry]) -> StorageResult<()>;
}

/// Catalog stored as pretty-printed JSON arrays
#[derive(Debug, Clone)]
pub struct JsonStorage {
    movies_path: PathBuf,
    series_path: PathBuf,
    episodes_path: PathBuf,
}

impl JsonStorage {
    pub fn new(
        movies_path: impl Into<PathBuf>,
        series_path: impl Into<PathBuf>,
        episodes_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            movies_path: movies_path.into(),
            series_path: series_path.into(),
            episodes_path: episodes_path.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(
            &config.movies_path,
            &config.series_path,
            &config.episodes_path,
        )
    }

    pub fn movies_path(&self) -> &Path {
        &self.movies_path
    }

    pub fn series_path(&self) -> &Path {
        &self.series_path
    }

    pub fn episodes_path(&self) -> &Path {
        &self.episodes_path
    }
}

impl CatalogStorage for JsonStorage {
    fn load(&self) -> StorageResult<Catalog> {
        let catalog = Catalog {
            movies: load_section(&self.movies_path)?,
            series: load_section(&self.series_path)?,
            episodes: load_section(&self.episodes_path)?,
        };

        tracing::info!(
            "Loaded catalog: {} movies, {} series, {} episodes",
            catalog.movies.len(),
            catalog.series.len(),
            catalog.episodes.len()
        );

        Ok(catalog)
    }

    fn save_movies(&self, movies: &[MovieEntry]) -> StorageResult<()> {
        write_section(&self.movies_path, movies)
    }

    fn save_series(&self, series: &[SeriesEntry], episodes: &[EpisodeEntry]) -> StorageResult<()> {
        write_section(&self.series_path, series)?;
        write_section(&self.episodes_path, episodes)
    }
}

fn load_section<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&content) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!("{} is not a valid catalog file: {}", path.display(), e);
            preserve_corrupt(path);
            Ok(Vec::new())
        }
    }
}

/// Moves an unparseable file out of the way so the next save cannot destroy it
fn preserve_corrupt(path: &Path) {
    let mut target = path.as_os_str().to_owned();
    target.push(".corrupt");
    let target = PathBuf::from(target);

    match fs::rename(path, &target) {
        Ok(()) => tracing::warn!("Moved {} to {}", path.display(), target.display()),
        Err(e) => tracing::warn!("Could not move {} aside: {}", path.display(), e),
    }
}

fn write_section<T: Serialize>(path: &Path, items: &[T]) -> StorageResult<()> {
    let io_error = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(items)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(io_error)?;

    tracing::debug!("Wrote {} entries to {}", items.len(), path.display());
    Ok(())
}
