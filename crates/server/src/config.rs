//! Server configuration loaded from environment variables.

use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use model::GenreTable;
use upstream::{HttpUpstream, RetryPolicy, UpstreamError};

use crate::engine::{MovieAggregator, UpstreamEndpoints};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_INDEX_URL: &str = "http://localhost:3040/movies";
pub const DEFAULT_DETAILS_URL: &str = "http://localhost:3030/movies";
pub const DEFAULT_CAST_URL: &str = "http://localhost:3050/artists";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`)
    pub host: String,
    /// Bind port (default: `8000`)
    pub port: u16,
    pub endpoints: UpstreamEndpoints,
    /// Timeout of a single upstream HTTP call
    pub upstream_timeout: Duration,
    /// Retry policy for the index and details calls
    pub retry: RetryPolicy,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                         |
    /// |-------------------------|---------------------------------|
    /// | `HOST`                  | `0.0.0.0`                       |
    /// | `PORT`                  | `8000`                          |
    /// | `MOVIE_INDEX_URL`       | `http://localhost:3040/movies`  |
    /// | `MOVIE_DETAILS_URL`     | `http://localhost:3030/movies`  |
    /// | `CAST_DETAILS_URL`      | `http://localhost:3050/artists` |
    /// | `UPSTREAM_TIMEOUT_SECS` | `30`                            |
    /// | `RETRY_MAX_ATTEMPTS`    | unset (retry forever)           |
    /// | `RETRY_BACKOFF_MS`      | `0`                             |
    /// | `RETRY_MAX_BACKOFF_MS`  | `0`                             |
    /// | `RETRY_DEADLINE_SECS`   | unset (no deadline)             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = string("HOST", DEFAULT_HOST);
        let port = parse(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

        let endpoints = UpstreamEndpoints {
            index: string("MOVIE_INDEX_URL", DEFAULT_INDEX_URL),
            details: string("MOVIE_DETAILS_URL", DEFAULT_DETAILS_URL),
            cast: string("CAST_DETAILS_URL", DEFAULT_CAST_URL),
        };

        let timeout_secs =
            parse(&lookup, "UPSTREAM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        let max_attempts: Option<u32> = parse(&lookup, "RETRY_MAX_ATTEMPTS")?;
        if max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "RETRY_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let backoff_ms: u64 = parse(&lookup, "RETRY_BACKOFF_MS")?.unwrap_or(0);
        let max_backoff_ms: u64 = parse(&lookup, "RETRY_MAX_BACKOFF_MS")?.unwrap_or(0);
        let deadline_secs: Option<u64> = parse(&lookup, "RETRY_DEADLINE_SECS")?;

        let mut retry = RetryPolicy::unbounded().with_backoff(
            Duration::from_millis(backoff_ms),
            Duration::from_millis(max_backoff_ms),
        );
        retry.max_attempts = max_attempts;
        retry.deadline = deadline_secs.map(Duration::from_secs);

        Ok(Self {
            host,
            port,
            endpoints,
            upstream_timeout: Duration::from_secs(timeout_secs),
            retry,
        })
    }

    /// Resolve `host:port`; `host` may be an IP literal or a hostname.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = || ConfigError::InvalidBindAddress(format!("{}:{}", self.host, self.port));
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }

    /// Build the aggregator over HTTP upstreams and the TMDB genre table
    pub fn aggregator(&self) -> Result<MovieAggregator, UpstreamError> {
        let upstream = HttpUpstream::new(self.upstream_timeout)?;

        Ok(MovieAggregator::new(
            Arc::new(upstream),
            self.endpoints.clone(),
            Arc::new(GenreTable::tmdb()),
            self.retry.clone(),
        ))
    }
}

/// Parse an optional variable, treating empty values as unset
fn parse<T>(lookup: impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}
