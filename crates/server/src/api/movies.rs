use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

use pipeline::Page;

use super::AppState;
use super::error::AppResult;
use super::response::MoviesResponse;

/// Query string of `GET /movies`
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesParams {
    /// Genre name, matched exactly against the genre table. Unknown names
    /// are ignored.
    pub genre: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// GET /movies -- list (a page of) the movies of a genre, or of all genres.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> AppResult<Json<MoviesResponse>> {
    let aggregator = &state.aggregator;

    let genre = aggregator.genre_filter(params.genre.as_deref());

    let page = Page::new(params.offset, params.limit);
    info!(genre = ?genre.map(|g| g.name.as_str()), ?page, "List movies");

    let listing = aggregator.list(genre, page).await?;

    Ok(Json(MoviesResponse::new(listing, page)))
}
