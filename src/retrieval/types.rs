use crate::vectordb::DocumentPayload;

/// A retrieved document, ordered by [`RankedCandidate::score`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// Point id or source filename, whichever identified the document first.
    pub id: String,
    /// Rerank score when a reranker ran, the fused score otherwise.
    pub score: f32,
    /// Reciprocal rank fusion score.
    pub fused_score: f64,
    pub dense_rank: Option<usize>,
    pub sparse_rank: Option<usize>,
    pub payload: DocumentPayload,
    /// The payload could not be resolved; `payload` is empty.
    pub degraded: bool,
}

impl RankedCandidate {
    pub fn text(&self) -> &str {
        &self.payload.text
    }

    pub fn source(&self) -> &str {
        &self.payload.source
    }
}
