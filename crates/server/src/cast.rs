//! Cast resolution.
//!
//! Cast members are fetched in batches of [`CAST_BATCH_SIZE`], one request
//! per batch and no retry: a batch that fails is recorded as a
//! `CastBatchUnavailable` entry and skipped, the remaining batches still run.

use std::sync::Arc;

use tracing::{debug, warn};

use model::{CastMember, CastMemberId, ErrorEntry, Partial};
use upstream::{batch_url, Upstream};

/// Upper bound on ids per cast-details request
pub const CAST_BATCH_SIZE: usize = 5;

/// Fetches cast members from the cast-details service
#[derive(Clone)]
pub struct CastResolver {
    upstream: Arc<dyn Upstream>,
    base_url: String,
}

impl CastResolver {
    pub fn new(upstream: Arc<dyn Upstream>, base_url: impl Into<String>) -> Self {
        Self {
            upstream,
            base_url: base_url.into(),
        }
    }

    /// Resolve `cast_ids` into cast members.
    ///
    /// Returns `None` when no batch produced any member. Failed batches are
    /// reported in the returned errors; members from the other batches are
    /// kept, in upstream response order.
    pub async fn resolve(&self, cast_ids: &[CastMemberId]) -> Partial<Option<Vec<CastMember>>> {
        let mut members: Vec<CastMember> = Vec::new();
        let mut errors = Vec::new();

        for batch in pipeline::split(cast_ids, CAST_BATCH_SIZE) {
            match self.request_batch(&batch).await {
                Ok(batch_members) => {
                    debug!(
                        "Fetched {} cast members for {} ids",
                        batch_members.len(),
                        batch.len()
                    );
                    members.extend(batch_members);
                }
                Err(err) => {
                    warn!(cast_ids = ?batch, error = %err, "Cast details request failed");
                    errors.push(ErrorEntry::cast_batch_unavailable(&batch));
                }
            }
        }

        let cast = (!members.is_empty()).then_some(members);
        Partial::with_errors(cast, errors)
    }

    /// One attempt, no retry
    async fn request_batch(&self, ids: &[CastMemberId]) -> upstream::Result<Vec<CastMember>> {
        let url = batch_url(&self.base_url, ids)?;
        let response = self.upstream.get(&url).await?.error_for_status()?;
        response.data()
    }
}
