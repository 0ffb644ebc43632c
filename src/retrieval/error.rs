use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors that abort a retrieval call. Degraded paths never surface here.
pub enum RetrievalError {
    /// Query embedding failed.
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Dense search failed (index unreachable, missing collection, ...).
    #[error("vector index error: {0}")]
    VectorDb(#[from] VectorDbError),

    /// Invalid configuration.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
