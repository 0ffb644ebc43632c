use std::path::PathBuf;
use thiserror::Error;

use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned while loading or building a lexical snapshot.
pub enum LexicalError {
    /// `corpus` and `doc_ids` are not parallel.
    #[error("snapshot arrays differ in length: {corpus} documents, {doc_ids} ids")]
    LengthMismatch {
        /// Number of documents.
        corpus: usize,
        /// Number of ids.
        doc_ids: usize,
    },

    /// Snapshot file could not be read or written.
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file was not valid JSON.
    #[error("snapshot at {path} is malformed: {source}")]
    Malformed {
        /// Snapshot path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading documents out of the vector index failed.
    #[error("failed to export documents from vector index: {0}")]
    Export(#[from] VectorDbError),
}

/// Convenience result type for lexical operations.
pub type LexicalResult<T> = Result<T, LexicalError>;
