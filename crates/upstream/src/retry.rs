//! The resilient fetcher.
//!
//! `fetch_until_success` keeps issuing the same GET until the upstream
//! answers 200. The default [`RetryPolicy`] retries forever, immediately,
//! and treats every non-200 status (and every transport failure) alike.
//! Operators can bound it with a maximum attempt count, exponential backoff
//! and an overall deadline; call sites do not change.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::client::{Upstream, UpstreamResponse};
use crate::error::{Result, UpstreamError};

/// How hard `fetch_until_success` tries before giving up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries forever
    pub max_attempts: Option<u32>,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap for the doubling delay. Anything at or below `initial_backoff`
    /// keeps the delay constant.
    pub max_backoff: Duration,
    /// Overall time budget for one fetch, `None` for no limit
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    /// Retry forever with no delay
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            deadline: None,
        }
    }

    /// Give up after `max_attempts` calls, no delay between them
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Self::unbounded()
        }
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.deadline.is_none()
    }

    /// Delay to wait after the `attempt`-th failed call (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }

        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        let cap = self.max_backoff.max(self.initial_backoff);

        self.initial_backoff.saturating_mul(factor).min(cap)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// GET `url` until the upstream answers 200, as allowed by `policy`.
///
/// Non-success responses are logged with their status and body, transport
/// failures with their reason, and both are retried the same way. Returns
/// `RetriesExhausted` or `DeadlineExceeded` when a bounded policy gives up.
pub async fn fetch_until_success(
    upstream: &dyn Upstream,
    url: &str,
    policy: &RetryPolicy,
) -> Result<UpstreamResponse> {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        let last_status = match upstream.get(url).await {
            Ok(response) if response.is_success() => {
                info!(
                    url = %url,
                    status_code = response.status,
                    attempts,
                    "Response successful"
                );
                debug!(url = %url, response = %response.body, "Response body");
                return Ok(response);
            }
            Ok(response) => {
                error!(
                    status_code = response.status,
                    url = %url,
                    response = %response.body,
                    "Response error"
                );
                Some(response.status)
            }
            Err(err) => {
                error!(url = %url, error = %err, "Request error");
                None
            }
        };

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(UpstreamError::RetriesExhausted {
                url: url.to_string(),
                attempts,
                last_status,
            });
        }

        let delay = policy.backoff(attempts);
        if let Some(deadline) = policy.deadline {
            if started.elapsed() + delay >= deadline {
                return Err(UpstreamError::DeadlineExceeded {
                    url: url.to_string(),
                    deadline,
                    attempts,
                });
            }
        }

        if delay.is_zero() {
            // Immediate retry, but let other requests on this worker run
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
