//! Secure RAG library crate (used by the binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Query path
//! - [`QueryPipeline`], [`PipelineConfig`], [`Answer`] - Per-query orchestration
//! - [`HybridRetriever`], [`RetrieverConfig`] - Dense + lexical retrieval with rank fusion
//! - [`SemanticCache`], [`SemanticCacheConfig`] - Tenant/role scoped answer cache
//! - [`AccessReconciler`], [`AccessMode`] - Authorization allow-set resolution
//!
//! ## Collaborators
//! - [`Embedder`] ([`OllamaEmbedder`], [`StubEmbedder`])
//! - [`PointwiseScorer`] ([`Reranker`])
//! - [`Generator`] ([`GenaiGenerator`])
//! - [`SafetyClassifier`] ([`LlamaGuardClassifier`]) and [`Redactor`] ([`PatternRedactor`])
//! - [`AuthorizationClient`] ([`CerbosClient`])
//! - [`DocumentIndex`] ([`QdrantClient`]) and [`CacheStore`] ([`MemoryCacheStore`])
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod access;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod fusion;
pub mod generation;
pub mod guard;
pub mod hashing;
pub mod lexical;
pub mod pipeline;
pub mod retrieval;
pub mod vectordb;

#[cfg(any(test, feature = "mock"))]
pub use access::MockAuthorizationClient;
pub use access::{
    AccessError, AccessMode, AccessReconciler, AllowSet, AuthorizationClient, CerbosClient,
    CheckStrategy, Principal, ResourceRef, Verdict,
};
pub use cache::{
    CacheError, CacheHit, CacheStore, MemoryCacheStore, SemanticCache, SemanticCacheConfig,
};
pub use config::{Config, ConfigError, Profile};
pub use constants::{DimConfig, DimValidationError, REFUSAL_MESSAGE, validate_embedding_dim};
pub use embedding::{
    Embedder, EmbeddingError, OllamaEmbedder, PointwiseScorer, Reranker, RerankerConfig,
    RerankerError, StubEmbedder,
};
pub use fusion::{FusedCandidate, reciprocal_rank_fusion};
pub use generation::{GenaiGenerator, GenerationError, Generator};
pub use guard::{
    GuardError, LlamaGuardClassifier, NoopRedactor, PatternRedactor, Redactor, SafetyClassifier,
    SafetyVerdict,
};
pub use hashing::{cache_key, hash_query, hash_to_u64};
pub use lexical::{LexicalError, LexicalIndex, LexicalSnapshot};
pub use pipeline::{Answer, PipelineConfig, PipelineError, QueryPipeline};
pub use retrieval::{HybridRetriever, RankedCandidate, RetrievalError, RetrieverConfig};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockDocumentIndex;
pub use vectordb::{
    DocumentIndex, DocumentPayload, DocumentPoint, PayloadFilter, PrefilterPolicy, QdrantClient,
    ScoredDocument, Sensitivity, VectorDbError, build_prefilter,
};
