//! Hybrid dense + lexical retrieval with rank fusion and optional reranking.

pub mod config;
pub mod error;
pub mod retriever;
pub mod types;


pub use config::RetrieverConfig;
pub use error::{RetrievalError, RetrievalResult};
pub use retriever::HybridRetriever;
pub use types::RankedCandidate;
