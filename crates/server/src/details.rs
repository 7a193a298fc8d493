//! Movie detail resolution.
//!
//! ## Algorithm
//! 1. Split the ids into batches of [`DETAILS_BATCH_SIZE`]
//! 2. Fetch each batch through the resilient fetcher
//! 3. A batch that cannot be fetched becomes id-only placeholders, each with
//!    a `DetailsUnavailable` entry, and the next batch is tried
//! 4. Every record of a fetched batch gets its cast resolved; a missing or
//!    partial cast adds one `CastIncomplete` entry for that movie
//!
//! Records are emitted in the order the upstream returned them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use model::{ErrorEntry, GenreTable, Movie, MovieId, Partial, RawMovieDetail};
use upstream::{batch_url, fetch_until_success, RetryPolicy, Upstream};

use crate::cast::CastResolver;

/// Upper bound on ids per movie-details request
pub const DETAILS_BATCH_SIZE: usize = 5;

/// Fetches movie details and hydrates them into [`Movie`]s
#[derive(Clone)]
pub struct DetailResolver {
    upstream: Arc<dyn Upstream>,
    base_url: String,
    retry: RetryPolicy,
    genres: Arc<GenreTable>,
    cast: CastResolver,
}

impl DetailResolver {
    pub fn new(
        upstream: Arc<dyn Upstream>,
        base_url: impl Into<String>,
        retry: RetryPolicy,
        genres: Arc<GenreTable>,
        cast: CastResolver,
    ) -> Self {
        Self {
            upstream,
            base_url: base_url.into(),
            retry,
            genres,
            cast,
        }
    }

    /// Resolve `movie_ids` into movies, one batch at a time.
    pub async fn resolve(&self, movie_ids: &[MovieId]) -> Partial<Vec<Movie>> {
        let mut result: Partial<Vec<Movie>> = Partial::default();

        for batch in pipeline::split(movie_ids, DETAILS_BATCH_SIZE) {
            let details = match self.request_details(&batch).await {
                Ok(details) if !details.is_empty() => details,
                Ok(_) => {
                    warn!(ids = ?batch, "Movie details batch came back empty");
                    Self::degrade(&batch, &mut result);
                    continue;
                }
                Err(err) => {
                    warn!(ids = ?batch, error = %err, "Movie details batch unavailable");
                    Self::degrade(&batch, &mut result);
                    continue;
                }
            };

            if details.len() != batch.len() {
                warn!(
                    "Movie details mismatch: requested={}, returned={}",
                    batch.len(),
                    details.len()
                );
            }

            for detail in details {
                let movie = self.build_movie(detail).await;
                let movie = result.absorb(movie);
                result.value.push(movie);
            }
        }

        result
    }

    async fn request_details(&self, ids: &[MovieId]) -> upstream::Result<Vec<RawMovieDetail>> {
        let url = batch_url(&self.base_url, ids)?;
        info!(url = %url, "GET movies details");

        let response = fetch_until_success(self.upstream.as_ref(), &url, &self.retry).await?;
        response.data()
    }

    /// Placeholders plus one `DetailsUnavailable` entry per id
    fn degrade(batch: &[MovieId], result: &mut Partial<Vec<Movie>>) {
        for &id in batch {
            result.value.push(Movie::placeholder(id));
            result.push_error(ErrorEntry::details_unavailable(id));
        }
    }

    /// Resolve the cast of one record and build its movie.
    ///
    /// Cast batch failures stay here: they are collapsed into a single
    /// `CastIncomplete` entry for the movie.
    async fn build_movie(&self, detail: RawMovieDetail) -> Partial<Movie> {
        let movie_id = detail.id;
        let cast_ids = detail.cast.clone();

        let (cast, cast_errors) = if cast_ids.is_empty() {
            (None, Vec::new())
        } else {
            self.cast.resolve(&cast_ids).await.into_parts()
        };

        let mut errors = Vec::new();
        if cast.is_none() || !cast_errors.is_empty() {
            for entry in &cast_errors {
                debug!(id = movie_id, error_code = entry.error_code, message = %entry.message, "Cast batch error");
            }
            warn!(
                id = movie_id,
                cast_ids = ?cast_ids,
                "Movie id #{} cast info is not complete",
                movie_id
            );
            errors.push(ErrorEntry::cast_incomplete(movie_id));
        }

        Partial::with_errors(Movie::from_detail(detail, &self.genres, cast), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::ErrorCode;
    use serde_json::{json, Value};
    use upstream::{Scripted, ScriptedUpstream};

    const DETAILS_URL: &str = "http://localhost:3030/movies";
    const CAST_URL: &str = "http://localhost:3050/artists";

    fn detail(id: u64, cast: &[u64]) -> Value {
        json!({
            "id": id,
            "title": format!("Movie {id}"),
            "releaseDate": "2008-06-12",
            "revenue": 163712074,
            "posterPath": "www",
            "genres": [878, 28, 12],
            "cast": cast
        })
    }

    fn member(id: u64) -> Value {
        json!({ "id": id, "gender": 1, "name": format!("Actor {id}"), "profilePath": "www" })
    }

    fn detail_resolver(script: Vec<Scripted>, retry: RetryPolicy) -> (DetailResolver, Arc<ScriptedUpstream>) {
        let upstream = Arc::new(ScriptedUpstream::new(script));
        let cast = CastResolver::new(upstream.clone(), CAST_URL);
        let resolver = DetailResolver::new(
            upstream.clone(),
            DETAILS_URL,
            retry,
            Arc::new(GenreTable::tmdb()),
            cast,
        );
        (resolver, upstream)
    }

    #[tokio::test]
    async fn test_complete_movies() {
        let (resolver, upstream) = detail_resolver(
            vec![
                Scripted::ok(json!([detail(1, &[10]), detail(2, &[20, 21])])),
                Scripted::ok(json!([member(10)])),
                Scripted::ok(json!([member(20), member(21)])),
            ],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1, 2]).await;

        assert!(result.is_clean());
        assert_eq!(result.value.len(), 2);
        assert!(result.value.iter().all(Movie::is_complete));
        assert_eq!(result.value[1].cast.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            upstream.calls().await,
            vec![
                format!("{DETAILS_URL}?ids=1%2C2"),
                format!("{CAST_URL}?id=10"),
                format!("{CAST_URL}?ids=20%2C21"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_batch_degrades_every_id() {
        let (resolver, _upstream) =
            detail_resolver(vec![Scripted::unreachable()], RetryPolicy::bounded(3));

        let result = resolver.resolve(&[1, 2, 3]).await;

        assert_eq!(
            result.value,
            vec![Movie::placeholder(1), Movie::placeholder(2), Movie::placeholder(3)]
        );
        assert_eq!(
            result.errors,
            vec![
                ErrorEntry::details_unavailable(1),
                ErrorEntry::details_unavailable(2),
                ErrorEntry::details_unavailable(3),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort_the_next() {
        // 6 ids => batches [1..5] and [6]; the first batch never succeeds
        let (resolver, upstream) = detail_resolver(
            vec![
                Scripted::status(500),
                Scripted::status(500),
                Scripted::ok(json!([detail(6, &[60])])),
                Scripted::ok(json!([member(60)])),
            ],
            RetryPolicy::bounded(2),
        );

        let result = resolver.resolve(&[1, 2, 3, 4, 5, 6]).await;

        assert_eq!(result.value.len(), 6);
        assert!(result.value[..5].iter().all(|m| m.title.is_none()));
        assert!(result.value[5].is_complete());
        assert_eq!(result.errors.len(), 5);
        assert!(result.errors.iter().all(|e| e.is(ErrorCode::DetailsUnavailable)));

        let calls = upstream.calls().await;
        assert_eq!(calls[2], format!("{DETAILS_URL}?id=6"));
    }

    #[tokio::test]
    async fn test_details_are_retried_until_success() {
        let (resolver, upstream) = detail_resolver(
            vec![
                Scripted::status(500),
                Scripted::status(502),
                Scripted::ok(json!([detail(1, &[10])])),
                Scripted::ok(json!([member(10)])),
            ],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1]).await;

        assert!(result.is_clean());
        assert_eq!(upstream.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_partial_cast_adds_one_cast_incomplete() {
        // 6 cast ids => two cast batches, the second fails
        let (resolver, _upstream) = detail_resolver(
            vec![
                Scripted::ok(json!([detail(1, &[10, 11, 12, 13, 14, 15])])),
                Scripted::ok(json!([member(10), member(11)])),
                Scripted::status(500),
            ],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1]).await;

        let movie = &result.value[0];
        assert_eq!(movie.title.as_deref(), Some("Movie 1"));
        assert_eq!(movie.release_year, Some(2008));
        assert_eq!(movie.cast.as_ref().map(Vec::len), Some(2));
        assert_eq!(result.errors, vec![ErrorEntry::cast_incomplete(1)]);
    }

    #[tokio::test]
    async fn test_missing_cast_ids_mark_cast_incomplete() {
        let (resolver, upstream) = detail_resolver(
            vec![Scripted::ok(json!([detail(1, &[])]))],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1]).await;

        assert!(result.value[0].cast.is_none());
        assert_eq!(result.errors, vec![ErrorEntry::cast_incomplete(1)]);
        assert_eq!(upstream.call_count().await, 1, "No cast request without ids");
    }

    #[tokio::test]
    async fn test_empty_batch_response_degrades() {
        let (resolver, _upstream) =
            detail_resolver(vec![Scripted::ok(json!([]))], RetryPolicy::default());

        let result = resolver.resolve(&[4, 5]).await;

        assert_eq!(result.value, vec![Movie::placeholder(4), Movie::placeholder(5)]);
        assert_eq!(result.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_null_poster_keeps_the_batch() {
        let mut without_poster = detail(2, &[20]);
        without_poster["posterPath"] = Value::Null;
        let (resolver, _upstream) = detail_resolver(
            vec![
                Scripted::ok(json!([detail(1, &[10]), without_poster])),
                Scripted::ok(json!([member(10)])),
                Scripted::ok(json!([member(20)])),
            ],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1, 2]).await;

        assert!(result.is_clean(), "errors: {:?}", result.errors);
        assert_eq!(result.value[0].title.as_deref(), Some("Movie 1"));
        assert!(result.value[0].is_complete());

        let second = &result.value[1];
        assert_eq!(second.title.as_deref(), Some("Movie 2"));
        assert_eq!(second.poster_path, None);
        assert_eq!(second.cast.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_response_order_is_kept() {
        let (resolver, _upstream) = detail_resolver(
            vec![
                Scripted::ok(json!([detail(2, &[20]), detail(1, &[10])])),
                Scripted::ok(json!([member(20)])),
                Scripted::ok(json!([member(10)])),
            ],
            RetryPolicy::default(),
        );

        let result = resolver.resolve(&[1, 2]).await;

        let ids: Vec<_> = result.value.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_error_order_follows_discovery() {
        // Batch 1 (5 ids) fails, batch 2 has a movie without cast
        let (resolver, _upstream) = detail_resolver(
            vec![
                Scripted::unreachable(),
                Scripted::ok(json!([detail(6, &[])])),
            ],
            RetryPolicy::bounded(1),
        );

        let result = resolver.resolve(&[1, 2, 3, 4, 5, 6]).await;

        let codes: Vec<_> = result.errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![450, 450, 450, 450, 450, 440]);
    }
}
