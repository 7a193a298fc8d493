//! Response envelope of `GET /movies`.

use serde::Serialize;

use model::{ErrorEntry, Movie, MovieListing};
use pipeline::Page;

/// `{"data": {"movies": [...]}, "metadata": {...}, "errors": [...] | null}`
#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub data: MoviesData,
    pub metadata: Metadata,
    pub errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Serialize)]
pub struct MoviesData {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

impl Metadata {
    /// Offset as requested (0 when absent). Limit is the number of movies
    /// actually returned, so a page past the end reports 0.
    pub fn new(page: Page, returned: usize, total: usize) -> Self {
        Self {
            offset: page.offset.unwrap_or(0),
            limit: returned,
            total,
        }
    }
}

impl MoviesResponse {
    pub fn new(listing: MovieListing, page: Page) -> Self {
        Self {
            metadata: Metadata::new(page, listing.movies.len(), listing.total),
            data: MoviesData {
                movies: listing.movies,
            },
            errors: listing.errors,
        }
    }
}
