//! The transport seam.
//!
//! Everything above this module talks to upstreams through the [`Upstream`]
//! trait, so the resolvers can be exercised against scripted responses
//! without a network.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, UpstreamError};

/// A single GET against an upstream service.
///
/// Implementations return every HTTP response, successful or not; only
/// failures to obtain a response at all are errors.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, url: &str) -> Result<UpstreamResponse>;
}

/// Status and raw body of an upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Every upstream wraps its payload as `{"data": ...}`
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

impl UpstreamResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Upstreams signal success with exactly 200
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Turn a non-200 response into [`UpstreamError::Status`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(UpstreamError::Status {
                url: self.url,
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode the `data` member of the response body
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str::<Envelope<T>>(&self.body)
            .map(|envelope| envelope.data)
            .map_err(|e| UpstreamError::Decode {
                url: self.url.clone(),
                reason: e.to_string(),
            })
    }
}

/// [`Upstream`] over HTTP, backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Build a client whose individual requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Reuse an existing client (and its connection pool)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: &str) -> Result<UpstreamResponse> {
        debug!(url = %url, "GET");

        let transport = |e: reqwest::Error| UpstreamError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        Ok(UpstreamResponse::new(url, status, body))
    }
}
