//! # Movie Aggregation Engine
//!
//! Coordinates one listing request:
//! 1. Fetch the id list for the genre from the index service
//! 2. Paginate the ids locally
//! 3. Resolve details (and, through them, casts) for the page
//! 4. Return the movies, the unpaginated total and the accumulated errors
//!
//! Upstream calls run one after another. Only losing the id list fails the
//! request; every other upstream failure degrades the result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use model::{Genre, GenreTable, MovieId, MovieListing};
use pipeline::Page;
use upstream::{fetch_until_success, merge_query, RetryPolicy, Upstream};

use crate::cast::CastResolver;
use crate::details::DetailResolver;
use crate::error::{AggregationError, Result};

/// Base URLs of the three upstream services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    /// Movie index, answers with the ids for a genre
    pub index: String,
    pub details: String,
    pub cast: String,
}

/// Composes the movie listing from the index, details and cast services
#[derive(Clone)]
pub struct MovieAggregator {
    upstream: Arc<dyn Upstream>,
    index_url: String,
    retry: RetryPolicy,
    genres: Arc<GenreTable>,
    details: DetailResolver,
}

impl MovieAggregator {
    /// Wire the resolvers over a shared upstream client.
    ///
    /// `retry` applies to the index and details calls; cast calls are made
    /// once.
    pub fn new(
        upstream: Arc<dyn Upstream>,
        endpoints: UpstreamEndpoints,
        genres: Arc<GenreTable>,
        retry: RetryPolicy,
    ) -> Self {
        let cast = CastResolver::new(upstream.clone(), endpoints.cast);
        let details = DetailResolver::new(
            upstream.clone(),
            endpoints.details,
            retry.clone(),
            genres.clone(),
            cast,
        );

        Self {
            upstream,
            index_url: endpoints.index,
            retry,
            genres,
            details,
        }
    }

    /// Genre table used for lookups and for naming genre ids
    pub fn genres(&self) -> &GenreTable {
        &self.genres
    }

    /// Genre to filter on for a requested name.
    ///
    /// An empty or unknown name means no filter: the listing covers every
    /// genre. Unknown names are logged.
    pub fn genre_filter(&self, name: Option<&str>) -> Option<&Genre> {
        let name = name.filter(|n| !n.is_empty())?;
        let genre = self.genres.lookup(name);
        if genre.is_none() {
            warn!(genre = %name, "Unknown genre, listing all movies");
        }
        genre
    }

    /// Main entry point: list the movies of `genre` (all movies when `None`).
    ///
    /// # Returns
    /// The hydrated movies of the requested page, the number of ids before
    /// pagination, and the partial failures met on the way.
    pub async fn list(&self, genre: Option<&Genre>, page: Page) -> Result<MovieListing> {
        let start_time = Instant::now();

        let ids = self.list_ids(genre).await?;
        let total = ids.len();
        info!(
            genre = genre.map(|g| g.name.as_str()),
            "Fetched {} movie ids from index",
            total
        );

        let page_ids = page.apply(&ids);
        debug!(
            "Paginated ids: offset={:?}, limit={:?}, remaining={}",
            page.offset,
            page.limit,
            page_ids.len()
        );

        let (movies, errors) = self.details.resolve(page_ids).await.into_parts();

        info!(
            "Aggregated {} movies with {} errors in {:?}",
            movies.len(),
            errors.len(),
            start_time.elapsed()
        );

        Ok(MovieListing {
            movies,
            total,
            errors: (!errors.is_empty()).then_some(errors),
        })
    }

    async fn list_ids(&self, genre: Option<&Genre>) -> Result<Vec<MovieId>> {
        let params: Vec<(&str, &str)> = genre
            .map(|g| vec![("genre", g.name.as_str())])
            .unwrap_or_default();

        let index_unavailable = |source| AggregationError::IndexUnavailable {
            url: self.index_url.clone(),
            source,
        };

        let url = merge_query(&self.index_url, &params).map_err(index_unavailable)?;
        info!(url = %url, "GET movie ids");

        let response = fetch_until_success(self.upstream.as_ref(), &url, &self.retry)
            .await
            .map_err(index_unavailable)?;
        response.data().map_err(index_unavailable)
    }
}
