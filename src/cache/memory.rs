use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::config::DEFAULT_CACHE_CAPACITY;
use super::error::{CacheError, CacheResult};
use super::store::{CacheFields, CacheStore};
use crate::hashing::key_matcher;

#[derive(Clone)]
struct StoredHash {
    fields: Arc<CacheFields>,
    ttl: Duration,
}

/// Each entry lives for the ttl given on its last write.
struct PerEntryTtl;

impl Expiry<String, StoredHash> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredHash,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredHash,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process [`CacheStore`] backed by a bounded moka cache.
pub struct MemoryCacheStore {
    entries: Cache<String, StoredHash>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a store holding at most `capacity` keys.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl CacheStore for MemoryCacheStore {
    async fn hset(&self, key: &str, fields: CacheFields, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            StoredHash {
                fields: Arc::new(fields),
                ttl,
            },
        );
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> CacheResult<Option<CacheFields>> {
        Ok(self
            .entries
            .get(key)
            .map(|stored| stored.fields.as_ref().clone()))
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        let matcher = key_matcher(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let matching: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(key, _)| matcher.is_match(key.as_str()))
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0u64;
        for key in matching {
            if self.entries.remove(key.as_str()).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
