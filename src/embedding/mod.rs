//! Query embedding and pointwise relevance scoring.
//!
//! - [`Embedder`] turns text into a fixed-dimension vector ([`OllamaEmbedder`],
//!   [`StubEmbedder`]).
//! - [`reranker`] provides the cross-encoder used to re-order fused candidates.

/// BERT cross-encoder head used by the reranker.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
mod ollama;
/// Cross-encoder reranker.
pub mod reranker;
mod stub;
/// Tokenizer loading helpers.
pub mod utils;


use async_trait::async_trait;

pub use error::{EmbeddingError, EmbeddingResult};
pub use ollama::{DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL, OllamaEmbedder};
pub use reranker::{PointwiseScorer, Reranker, RerankerConfig, RerankerError};
pub use stub::StubEmbedder;

/// Produces dense query vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Output dimension.
    fn dimension(&self) -> usize;
}

/// L2-normalizes `v` in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
