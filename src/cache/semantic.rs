use std::time::Duration;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::hashing::{cache_key, cache_key_pattern, normalize_segment};
use crate::vectordb::cosine_similarity;

use super::config::SemanticCacheConfig;
use super::entry::{CacheEntry, CacheHit};
use super::error::CacheResult;
use super::store::CacheStore;

/// Semantic answer cache over a [`CacheStore`].
pub struct SemanticCache<S: CacheStore> {
    store: S,
    config: SemanticCacheConfig,
}

impl<S: CacheStore> std::fmt::Debug for SemanticCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: CacheStore> SemanticCache<S> {
    pub fn new(store: S, config: SemanticCacheConfig) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cached answer for `(tenant, role, query)` when the stored
    /// embedding is similar enough to `embedding`.
    ///
    /// Unreadable entries are reported as misses and left in place.
    #[instrument(skip(self, query, embedding), fields(tenant = %tenant, role = %role))]
    pub async fn get(
        &self,
        query: &str,
        embedding: &[f32],
        tenant: &str,
        role: &str,
    ) -> CacheResult<Option<CacheHit>> {
        let key = cache_key(tenant, role, query);

        let Some(fields) = self.store.hgetall(&key).await? else {
            debug!("Cache miss (no entry)");
            return Ok(None);
        };

        let Some(entry) = CacheEntry::from_fields(&fields) else {
            warn!(key = %key, "Cache entry unreadable, treating as miss");
            return Ok(None);
        };

        let similarity = cosine_similarity(&entry.embedding, embedding);
        if similarity < self.config.threshold {
            debug!(
                similarity,
                threshold = self.config.threshold,
                "Cache miss (below similarity threshold)"
            );
            return Ok(None);
        }

        debug!(similarity, "Cache hit");
        Ok(Some(CacheHit {
            answer: entry.answer,
            sources: entry.sources,
            similarity,
            cached_query: entry.query,
            timestamp: entry.timestamp,
        }))
    }

    /// Writes (or overwrites) the entry for `(tenant, role, query)` and refreshes its ttl.
    #[allow(clippy::too_many_arguments)]
    #[instrument(
        skip(self, query, embedding, answer, sources),
        fields(tenant = %tenant, role = %role, sources = sources.len())
    )]
    pub async fn set(
        &self,
        query: &str,
        embedding: &[f32],
        answer: &str,
        sources: &[String],
        tenant: &str,
        role: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let key = cache_key(tenant, role, query);
        let entry = CacheEntry {
            tenant: normalize_segment(tenant),
            role: normalize_segment(role),
            query: query.to_string(),
            embedding: embedding.to_vec(),
            answer: answer.to_string(),
            sources: sources.to_vec(),
            timestamp: Utc::now(),
        };

        let ttl = ttl.unwrap_or(self.config.ttl);
        self.store.hset(&key, entry.to_fields()?, ttl).await?;
        debug!(ttl_secs = ttl.as_secs(), "Cache entry stored");
        Ok(())
    }

    /// Deletes entries by tenant, role, both, or everything when both are `None`.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, tenant: Option<&str>, role: Option<&str>) -> CacheResult<u64> {
        let pattern = cache_key_pattern(tenant, role);
        let removed = self.store.delete_matching(&pattern).await?;
        debug!(pattern = %pattern, removed, "Cache invalidated");
        Ok(removed)
    }
}
