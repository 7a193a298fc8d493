//! Errors raised while talking to an upstream service.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when calling an upstream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Invalid upstream URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection refused, reset, timed out, ...
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The upstream answered, but not with 200
    #[error("Upstream {url} answered with status {status}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The retry policy ran out of attempts
    #[error("Gave up on {url} after {attempts} attempts (last status: {last_status:?})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_status: Option<u16>,
    },

    /// The retry policy ran out of time
    #[error("Deadline of {deadline:?} exceeded for {url} after {attempts} attempts")]
    DeadlineExceeded {
        url: String,
        deadline: Duration,
        attempts: u32,
    },
}

impl UpstreamError {
    /// True for the errors a bounded retry policy gives up with
    pub fn is_retry_limit(&self) -> bool {
        matches!(
            self,
            UpstreamError::RetriesExhausted { .. } | UpstreamError::DeadlineExceeded { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, UpstreamError>;
