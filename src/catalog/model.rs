//! Catalog record types and their JSON shape

use crate::catalog::metadata::ExternalMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media a crawl target holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// One catalog entry per movie folder
    Movie,

    /// One series entry per show, one episode entry per file
    Series,
}

impl Category {
    /// Label used when a target does not name one
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Series => "Series",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single movie, represented by one playable file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub id: u64,

    /// Human-readable name derived from the representative file
    pub name: String,

    /// Playable file URL, exactly as fetched
    pub url: String,

    /// Decoded key of the folder the movie was found in
    pub folder: String,

    /// Label of the target the movie came from
    #[serde(rename = "category_id")]
    pub category: String,

    /// Poster URL, empty until a metadata lookup provides one
    #[serde(default)]
    pub image: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl MovieEntry {
    /// Copies looked-up metadata onto the entry. Identity fields are untouched.
    pub fn apply_metadata(&mut self, metadata: ExternalMetadata) {
        if let Some(poster) = metadata.poster_url {
            self.image = poster;
        }
        self.title = metadata.display_name.or(self.title.take());
        self.rating = metadata.rating.or(self.rating);
        self.genre = metadata.genre.or(self.genre.take());
    }
}

/// A show, identified by the stable ID of its folder name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub id: u64,
    pub name: String,

    /// Decoded key of the show's folder
    pub folder: String,

    #[serde(rename = "category_id")]
    pub category: String,

    #[serde(default)]
    pub image: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl SeriesEntry {
    /// Copies looked-up metadata onto the entry. Identity fields are untouched.
    pub fn apply_metadata(&mut self, metadata: ExternalMetadata) {
        if let Some(poster) = metadata.poster_url {
            self.image = poster;
        }
        self.title = metadata.display_name.or(self.title.take());
        self.rating = metadata.rating.or(self.rating);
        self.genre = metadata.genre.or(self.genre.take());
    }
}

/// A playable file belonging to a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    /// `"<series_id>-<ordinal>"`, ordinal counting from 1 per series
    pub id: String,
    pub series_id: u64,

    /// `"Season N"`
    pub season: String,
    pub name: String,

    /// Playable file URL, exactly as fetched
    pub url: String,
}

/// The three catalog sections held in memory during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub movies: Vec<MovieEntry>,
    pub series: Vec<SeriesEntry>,
    pub episodes: Vec<EpisodeEntry>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.series.is_empty() && self.episodes.is_empty()
    }

    /// Looks up a series by its stable ID
    pub fn series_by_id(&self, id: u64) -> Option<&SeriesEntry> {
        self.series.iter().find(|series| series.id == id)
    }
}
