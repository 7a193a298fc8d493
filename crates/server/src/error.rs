//! Hard failures of an aggregation request.
//!
//! Partial upstream failures are reported as error entries next to the
//! result; only losing the id list aborts the whole request.

use thiserror::Error;
use upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum AggregationError {
    /// The movie index could not be read, so there is nothing to aggregate
    #[error("Failed to list movie ids from {url}: {source}")]
    IndexUnavailable {
        url: String,
        #[source]
        source: UpstreamError,
    },
}

pub type Result<T> = std::result::Result<T, AggregationError>;
