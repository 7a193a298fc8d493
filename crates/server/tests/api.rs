//! Tests for the HTTP boundary, driven through the router with a scripted
//! upstream.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use model::GenreTable;
use server::api::{self, AppState};
use server::{MovieAggregator, UpstreamEndpoints};
use upstream::{RetryPolicy, Scripted, ScriptedUpstream};

// ============================================================================
// Helpers
// ============================================================================

fn build_app(script: Vec<Scripted>, retry: RetryPolicy) -> (Router, Arc<ScriptedUpstream>) {
    let upstream = Arc::new(ScriptedUpstream::new(script));
    let endpoints = UpstreamEndpoints {
        index: "http://index/movies".to_string(),
        details: "http://details/movies".to_string(),
        cast: "http://cast/artists".to_string(),
    };
    let aggregator = MovieAggregator::new(
        upstream.clone(),
        endpoints,
        Arc::new(GenreTable::tmdb()),
        retry,
    );

    (api::router(AppState::new(aggregator)), upstream)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn star_wars() -> Value {
    json!({
        "id": 1893,
        "title": "Star Wars: Episode I - The Phantom Menace",
        "releaseDate": "1999-05-19",
        "revenue": 924317558,
        "posterPath": "/n8V09dDc02KsSN6Q4hC2BX6hN8X.jpg",
        "genres": [12, 28, 878],
        "cast": [3896]
    })
}

fn liam_neeson() -> Value {
    json!({
        "id": 3896,
        "gender": 2,
        "name": "Liam Neeson",
        "profilePath": "/9mdAohLsDu36WaXV2N3SQ388bvz.jpg"
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, upstream) = build_app(vec![], RetryPolicy::default());

    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(upstream.call_count().await, 0);
}

#[tokio::test]
async fn list_movies_returns_envelope() {
    let (app, upstream) = build_app(
        vec![
            Scripted::ok(json!([1893])),
            Scripted::ok(json!([star_wars()])),
            Scripted::ok(json!([liam_neeson()])),
        ],
        RetryPolicy::default(),
    );

    let response = get(app, "/movies?genre=Action&offset=0&limit=10").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "data": {"movies": [{
                "id": "1893",
                "title": "Star Wars: Episode I - The Phantom Menace",
                "releaseYear": 1999,
                "revenue": "US$ 924,317,558",
                "posterPath": "/n8V09dDc02KsSN6Q4hC2BX6hN8X.jpg",
                "genres": ["Action", "Adventure", "Science Fiction"],
                "cast": [{
                    "id": "3896",
                    "gender": "Male",
                    "name": "Liam Neeson",
                    "profilePath": "/9mdAohLsDu36WaXV2N3SQ388bvz.jpg"
                }]
            }]},
            "metadata": {"offset": 0, "limit": 1, "total": 1},
            "errors": null
        })
    );
    assert_eq!(upstream.calls().await[0], "http://index/movies?genre=Action");
}

#[tokio::test]
async fn list_movies_reports_partial_failures() {
    let (app, _upstream) = build_app(
        vec![Scripted::ok(json!([7, 8])), Scripted::unreachable()],
        RetryPolicy::bounded(2),
    );

    let response = get(app, "/movies").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["movies"][0], json!({
        "id": "7",
        "title": null,
        "releaseYear": null,
        "revenue": null,
        "posterPath": null,
        "genres": null,
        "cast": null
    }));
    assert_eq!(
        json["errors"],
        json!([
            {"errorCode": 450, "message": "Movie id #7 details info is not available"},
            {"errorCode": 450, "message": "Movie id #8 details info is not available"}
        ])
    );
    assert_eq!(json["metadata"], json!({"offset": 0, "limit": 2, "total": 2}));
}

#[tokio::test]
async fn unknown_genre_lists_all_movies() {
    let (app, upstream) = build_app(vec![Scripted::ok(json!([]))], RetryPolicy::default());

    let response = get(app, "/movies?genre=action").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.calls().await, vec!["http://index/movies"]);
}

#[tokio::test]
async fn metadata_limit_is_the_returned_count() {
    let (app, _upstream) = build_app(
        vec![
            Scripted::ok(json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10])),
            Scripted::unreachable(),
        ],
        RetryPolicy::bounded(1),
    );

    let response = get(app, "/movies?offset=8&limit=5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["movies"].as_array().unwrap().len(), 2);
    assert_eq!(json["metadata"], json!({"offset": 8, "limit": 2, "total": 10}));
}

#[tokio::test]
async fn encoded_genre_is_decoded() {
    let (app, upstream) = build_app(vec![Scripted::ok(json!([]))], RetryPolicy::default());

    let response = get(app, "/movies?genre=TV%20Movie").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.calls().await, vec!["http://index/movies?genre=TV+Movie"]);
}

#[tokio::test]
async fn non_numeric_limit_is_rejected() {
    let (app, _upstream) = build_app(vec![], RetryPolicy::default());

    let response = get(app, "/movies?limit=ten").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_failure_is_bad_gateway() {
    let (app, _upstream) = build_app(vec![Scripted::status(500)], RetryPolicy::bounded(2));

    let response = get(app, "/movies").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_UNAVAILABLE");
    assert!(json["error"].as_str().unwrap().contains("http://index/movies"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _upstream) = build_app(vec![], RetryPolicy::default());

    let response = get(app, "/movies/1893").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
