use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_OVERFETCH_MULTIPLIER, DEFAULT_RERANK_POOL_MULTIPLIER,
};

use super::error::{RetrievalError, RetrievalResult};

#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    pub collection_name: String,
    /// Each modality fetches `top_k * overfetch_multiplier` results.
    pub overfetch_multiplier: usize,
    /// The reranker sees the best `top_k * rerank_pool_multiplier` fused candidates.
    pub rerank_pool_multiplier: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            overfetch_multiplier: DEFAULT_OVERFETCH_MULTIPLIER,
            rerank_pool_multiplier: DEFAULT_RERANK_POOL_MULTIPLIER,
        }
    }
}

impl RetrieverConfig {
    pub fn collection_name(mut self, name: &str) -> Self {
        self.collection_name = name.to_string();
        self
    }

    pub fn overfetch_multiplier(mut self, multiplier: usize) -> Self {
        self.overfetch_multiplier = multiplier;
        self
    }

    pub fn rerank_pool_multiplier(mut self, multiplier: usize) -> Self {
        self.rerank_pool_multiplier = multiplier;
        self
    }

    /// Per-modality fetch size for a request of `top_k`.
    pub fn fetch_size(&self, top_k: usize) -> usize {
        top_k.saturating_mul(self.overfetch_multiplier).max(top_k)
    }

    /// Number of fused candidates handed to the reranker.
    pub fn rerank_pool(&self, top_k: usize) -> usize {
        top_k.saturating_mul(self.rerank_pool_multiplier).max(top_k)
    }

    pub fn validate(&self) -> RetrievalResult<()> {
        if self.collection_name.trim().is_empty() {
            return Err(RetrievalError::ConfigError {
                reason: "collection_name must not be empty".to_string(),
            });
        }
        if self.overfetch_multiplier == 0 {
            return Err(RetrievalError::ConfigError {
                reason: "overfetch_multiplier must be > 0".to_string(),
            });
        }
        if self.rerank_pool_multiplier == 0 {
            return Err(RetrievalError::ConfigError {
                reason: "rerank_pool_multiplier must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
