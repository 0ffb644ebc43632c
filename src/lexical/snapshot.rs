use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{LexicalError, LexicalResult};
use crate::vectordb::{DocumentIndex, PayloadFilter};

/// Corpus snapshot used to build a [`super::LexicalIndex`].
///
/// Stored on disk as `{"corpus": [...], "doc_ids": [...]}`. Ids are either vector
/// point ids or source filenames, depending on how the snapshot was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalSnapshot {
    pub corpus: Vec<String>,
    pub doc_ids: Vec<String>,
}

impl LexicalSnapshot {
    /// Creates a snapshot from parallel arrays.
    pub fn new(corpus: Vec<String>, doc_ids: Vec<String>) -> LexicalResult<Self> {
        let snapshot = Self { corpus, doc_ids };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn validate(&self) -> LexicalResult<()> {
        if self.corpus.len() != self.doc_ids.len() {
            return Err(LexicalError::LengthMismatch {
                corpus: self.corpus.len(),
                doc_ids: self.doc_ids.len(),
            });
        }
        Ok(())
    }

    /// Reads a snapshot file.
    pub fn load(path: &Path) -> LexicalResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| LexicalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self =
            serde_json::from_str(&raw).map_err(|source| LexicalError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Writes the snapshot as JSON.
    pub fn save(&self, path: &Path) -> LexicalResult<()> {
        let json = serde_json::to_string(self).map_err(|source| LexicalError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| LexicalError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Exports every point with non-empty text from `collection`.
    ///
    /// Ids are point ids; points without an id fall back to their source name.
    pub async fn from_index<V: DocumentIndex>(
        index: &V,
        collection: &str,
        limit: u32,
    ) -> LexicalResult<Self> {
        let documents = index
            .scroll_by_filter(collection, &PayloadFilter::default(), limit)
            .await?;

        let mut corpus = Vec::with_capacity(documents.len());
        let mut doc_ids = Vec::with_capacity(documents.len());
        for doc in documents {
            if doc.payload.text.is_empty() {
                continue;
            }
            let id = if doc.id.is_empty() {
                doc.payload.source.clone()
            } else {
                doc.id
            };
            corpus.push(doc.payload.text);
            doc_ids.push(id);
        }

        info!(
            collection = collection,
            docs = corpus.len(),
            "Lexical snapshot exported from vector index"
        );

        Ok(Self { corpus, doc_ids })
    }
}
