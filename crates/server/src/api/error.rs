use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::AggregationError;

/// Errors a handler can answer with.
///
/// Rendered as `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Aggregation(err) => {
                tracing::error!(error = %err, "Aggregation failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
            }
        };

        let body = json!({
            "error": self.to_string(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
