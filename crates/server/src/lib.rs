//! Server crate for the movie aggregator.
//!
//! This crate contains the aggregation engine that composes the movie view
//! from the three upstream services, the resolvers it delegates to, and the
//! HTTP API that exposes it.

pub mod api;
pub mod cast;
pub mod config;
pub mod details;
pub mod engine;
pub mod error;

pub use api::{AppState, MoviesResponse};
pub use config::{ConfigError, ServerConfig};
pub use engine::{MovieAggregator, UpstreamEndpoints};
pub use error::AggregationError;
