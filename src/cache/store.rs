use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::error::CacheResult;

/// Field name -> raw value, as held by a hash-map store.
pub type CacheFields = HashMap<String, Vec<u8>>;

/// Field-level hash store with per-key expiry and glob deletion.
///
/// Writes are last-writer-wins; no compare-and-swap is offered or needed.
pub trait CacheStore: Send + Sync {
    /// Replaces all fields at `key` and (re)starts its time-to-live.
    fn hset(
        &self,
        key: &str,
        fields: CacheFields,
        ttl: Duration,
    ) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Returns every field at `key`, or `None` when absent or expired.
    fn hgetall(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = CacheResult<Option<CacheFields>>> + Send;

    /// Deletes keys matching a `*` / `?` glob and returns how many were removed.
    fn delete_matching(
        &self,
        pattern: &str,
    ) -> impl std::future::Future<Output = CacheResult<u64>> + Send;
}

impl<T: CacheStore> CacheStore for Arc<T> {
    async fn hset(&self, key: &str, fields: CacheFields, ttl: Duration) -> CacheResult<()> {
        (**self).hset(key, fields, ttl).await
    }

    async fn hgetall(&self, key: &str) -> CacheResult<Option<CacheFields>> {
        (**self).hgetall(key).await
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        (**self).delete_matching(pattern).await
    }
}
