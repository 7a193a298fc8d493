//! The genre table.
//!
//! Genres are a fixed list (TMDB's movie genres). The table is built once at
//! startup and shared read-only, usually behind an `Arc`, by everything that
//! needs to translate between genre names and ids.

use serde::Serialize;

/// Numeric genre identifier used by the upstream services
pub type GenreId = u32;

/// A single genre entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: GenreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// TMDB movie genres, in the order the upstream documents them
const TMDB_GENRES: &[(GenreId, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Immutable, ordered genre table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreTable {
    genres: Vec<Genre>,
}

impl GenreTable {
    /// Build a table from arbitrary entries (tests, alternate catalogs).
    ///
    /// Entries are expected to be id-unique; lookups return the first match.
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        Self {
            genres: genres.into_iter().collect(),
        }
    }

    /// The standard TMDB table
    pub fn tmdb() -> Self {
        Self::new(
            TMDB_GENRES
                .iter()
                .map(|&(id, name)| Genre::new(id, name)),
        )
    }

    /// Find a genre by its exact, case-sensitive name
    pub fn lookup(&self, name: &str) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.name == name)
    }

    /// Find a genre by id
    pub fn get(&self, id: GenreId) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.id == id)
    }

    /// Names of the genres whose id appears in `ids`.
    ///
    /// Names come out in table order, not in the order of `ids`, and ids
    /// that are not in the table are skipped.
    pub fn names_for(&self, ids: &[GenreId]) -> Vec<String> {
        self.genres
            .iter()
            .filter(|genre| ids.contains(&genre.id))
            .map(|genre| genre.name.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genre> {
        self.genres.iter()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

impl Default for GenreTable {
    fn default() -> Self {
        Self::tmdb()
    }
}
