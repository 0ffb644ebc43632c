use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;
use crate::guard::GuardError;
use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("question is empty")]
    EmptyQuestion,

    /// The input safety classifier flagged the question.
    #[error("blocked by safety policy (input)")]
    BlockedInput,

    #[error("input safety check failed: {0}")]
    Guard(#[from] GuardError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("invalid pipeline configuration: {reason}")]
    ConfigError { reason: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
