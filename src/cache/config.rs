use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_THRESHOLD, DEFAULT_CACHE_TTL_SECS};

use super::error::{CacheError, CacheResult};

/// Entry bound for the in-process store.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct SemanticCacheConfig {
    /// Minimum cosine similarity for a hit, in `[0, 1]`.
    pub threshold: f32,
    /// Default time-to-live of written entries.
    pub ttl: Duration,
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CACHE_THRESHOLD,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl SemanticCacheConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn validate(&self) -> CacheResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CacheError::ConfigError {
                reason: format!(
                    "threshold must be between 0.0 and 1.0, got {}",
                    self.threshold
                ),
            });
        }
        if self.ttl.is_zero() {
            return Err(CacheError::ConfigError {
                reason: "ttl must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
