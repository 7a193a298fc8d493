//! HTTP surface of the aggregator.
//!
//! | Route         | Handler                      |
//! |---------------|------------------------------|
//! | `GET /`       | [`health::health_check`]     |
//! | `GET /movies` | [`movies::list_movies`]      |

pub mod error;
pub mod health;
pub mod movies;
pub mod response;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::engine::MovieAggregator;

pub use error::AppError;
pub use response::{Metadata, MoviesData, MoviesResponse};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<MovieAggregator>,
}

impl AppState {
    pub fn new(aggregator: MovieAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// Build the application router with its tracing layer
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route("/movies", get(movies::list_movies))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
