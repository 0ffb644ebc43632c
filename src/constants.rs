//! Defaults shared across retrieval, caching and prompting.
//!
//! # Embedding dimension
//!
//! The embedding dimension is shared by the embedder, the vector index and the
//! semantic cache. Cache entries written under one dimension never produce hits
//! under another (cosine similarity of mismatched vectors is 0).
//!
//! 1. Use [`DimConfig`] to pass the dimension through initialization
//! 2. Use [`validate_embedding_dim`] at startup

/// Output dimension of `nomic-embed-text`.
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// RRF smoothing constant.
pub const RRF_K: f64 = 60.0;

pub const DEFAULT_TOP_K: usize = 5;

pub const DEFAULT_OVERFETCH_MULTIPLIER: usize = 3;

pub const DEFAULT_RERANK_POOL_MULTIPLIER: usize = 4;

pub const DEFAULT_CACHE_THRESHOLD: f32 = 0.95;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 360;

pub const DEFAULT_CONTEXT_CHAR_BUDGET: usize = 400;

pub const DEFAULT_COLLECTION_NAME: &str = "legal_docs";

pub const REFUSAL_MESSAGE: &str = "I can\u{2019}t provide that content.";

/// Runtime dimension configuration for modules that need to agree on vector sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Rejects a zero dimension.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Returns the dimension as a qdrant vector size.
    pub fn vector_size(&self) -> u64 {
        self.embedding_dim as u64
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    #[error("embedder produces {actual}-dimensional vectors, collection expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use secure_rag::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// let embedder_dim = 768;
/// validate_embedding_dim(embedder_dim, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
