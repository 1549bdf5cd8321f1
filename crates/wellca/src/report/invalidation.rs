//! Write-time invalidation of caches derived from daily records.

use std::sync::Arc;

use uuid::Uuid;

use wellca_core::cache::{Cache, CacheError, DERIVED_CACHES};
use wellca_core::record::DailyRecord;

/// Evicts every derived cache after a record is written or deleted.
///
/// Invalidation is coarse: any change to any record clears all of
/// [`DERIVED_CACHES`]. Callers hold the write lock and have already persisted
/// the change, so once this returns no stale value can be served.
pub struct InvalidationCoordinator<C> {
    cache: Arc<C>,
}

impl<C: Cache> InvalidationCoordinator<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Invalidates after a record was saved.
    pub async fn on_write(&self, record: &DailyRecord) -> Result<(), CacheError> {
        tracing::debug!(
            record_id = %record.id,
            date = %record.date,
            "Invalidating derived caches after write"
        );
        self.evict_derived().await
    }

    /// Invalidates after a record was deleted.
    pub async fn on_delete(&self, id: Uuid) -> Result<(), CacheError> {
        tracing::debug!(record_id = %id, "Invalidating derived caches after delete");
        self.evict_derived().await
    }

    /// Clears every derived cache. A failure on one cache does not stop the
    /// others; the first failure is returned.
    async fn evict_derived(&self) -> Result<(), CacheError> {
        let mut first_error = None;

        for name in DERIVED_CACHES {
            if let Err(err) = self.cache.evict_all(name).await {
                tracing::warn!(cache = name, error = %err, "Failed to invalidate cache");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
