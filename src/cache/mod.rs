//! Similarity-gated answer cache keyed by tenant, role and query text.
//!
//! A key match alone is not a hit: the stored query embedding must also be within
//! [`SemanticCacheConfig::threshold`] cosine similarity of the incoming one.

pub mod config;
pub mod entry;
pub mod error;
pub mod memory;
pub mod semantic;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_CACHE_CAPACITY, SemanticCacheConfig};
pub use entry::{CacheEntry, CacheHit, embedding_from_bytes, embedding_to_bytes};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCacheStore;
pub use semantic::SemanticCache;
pub use store::{CacheFields, CacheStore};
