//! Client side of the three upstream services (movie index, movie details,
//! cast details).
//!
//! This crate provides:
//! - The `Upstream` trait, a single GET returning status and body, and its
//!   `reqwest`-backed implementation
//! - Query-string merging and the `id=` / `ids=` batch convention
//! - The resilient fetcher and its `RetryPolicy`
//!
//! ## Example Usage
//! ```ignore
//! use upstream::{fetch_until_success, merge_query, HttpUpstream, RetryPolicy};
//!
//! let client = HttpUpstream::new(Duration::from_secs(30))?;
//! let url = merge_query("http://localhost:3040/movies", &[("genre", "Action")])?;
//! let response = fetch_until_success(&client, &url, &RetryPolicy::default()).await?;
//! let ids: Vec<u64> = response.data()?;
//! ```

pub mod client;
pub mod error;
pub mod query;
pub mod retry;

#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use client::{HttpUpstream, Upstream, UpstreamResponse};
pub use error::{Result, UpstreamError};
pub use query::{batch_url, id_query, merge_query};
pub use retry::{fetch_until_success, RetryPolicy};

#[cfg(any(test, feature = "test-util"))]
pub use scripted::{Scripted, ScriptedUpstream};
