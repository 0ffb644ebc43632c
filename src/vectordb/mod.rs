//! Vector index access (dense retrieval and payload resolution).

pub mod client;
pub mod error;
pub mod filter;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{DocumentIndex, QdrantClient};
pub use error::VectorDbError;
pub use filter::{FieldMatch, PayloadFilter, PrefilterPolicy, build_prefilter};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockDocumentIndex;
pub use model::{
    DocumentPayload, DocumentPoint, ScoredDocument, Sensitivity, cosine_similarity,
    parse_point_id,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait for the operation to be fully indexed and searchable.
    /// Maps to `wait=true`.
    Strong,
    /// Return immediately after the server acknowledges receipt.
    /// Maps to `wait=false`.
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
