use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::embedding::{Embedder, PointwiseScorer};
use crate::fusion::{FusedCandidate, reciprocal_rank_fusion};
use crate::lexical::LexicalIndex;
use crate::vectordb::{DocumentIndex, DocumentPayload, PayloadFilter, ScoredDocument};

use super::config::RetrieverConfig;
use super::error::RetrievalResult;
use super::types::RankedCandidate;

/// Outcome of resolving the payload of a lexical-only candidate.
enum Resolution {
    Found(ScoredDocument),
    /// The document exists but the filter excludes it.
    Excluded,
    /// Neither lookup produced a payload.
    Unresolved,
}

/// Dense + lexical retriever over a [`DocumentIndex`].
///
/// The lexical index and scorer are shared read-only and may be absent: without a
/// lexical index retrieval is dense-only, without a scorer the fused order is final.
pub struct HybridRetriever<V: DocumentIndex> {
    index: V,
    embedder: Arc<dyn Embedder>,
    lexical: Option<Arc<LexicalIndex>>,
    scorer: Option<Arc<dyn PointwiseScorer>>,
    config: RetrieverConfig,
}

impl<V: DocumentIndex> std::fmt::Debug for HybridRetriever<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridRetriever")
            .field("config", &self.config)
            .field("lexical_docs", &self.lexical.as_ref().map(|l| l.len()))
            .field("reranking", &self.scorer.is_some())
            .finish_non_exhaustive()
    }
}

impl<V: DocumentIndex> HybridRetriever<V> {
    pub fn new(
        index: V,
        embedder: Arc<dyn Embedder>,
        config: RetrieverConfig,
    ) -> RetrievalResult<Self> {
        config.validate()?;
        Ok(Self {
            index,
            embedder,
            lexical: None,
            scorer: None,
            config,
        })
    }

    pub fn with_lexical(mut self, lexical: Option<Arc<LexicalIndex>>) -> Self {
        self.lexical = lexical.filter(|l| !l.is_empty());
        self
    }

    pub fn with_scorer(mut self, scorer: Option<Arc<dyn PointwiseScorer>>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    pub fn index(&self) -> &V {
        &self.index
    }

    pub fn has_lexical(&self) -> bool {
        self.lexical.is_some()
    }

    /// Embeds `query` and retrieves at most `top_k` candidates satisfying `filter`.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&PayloadFilter>,
    ) -> RetrievalResult<Vec<RankedCandidate>> {
        let embedding = self.embedder.embed(query).await?;
        self.retrieve_with_embedding(query, embedding, top_k, filter)
            .await
    }

    /// Like [`retrieve`](Self::retrieve) with a precomputed query embedding.
    #[instrument(
        skip(self, query, embedding, filter),
        fields(top_k = top_k, filtered = filter.is_some_and(|f| !f.is_empty()))
    )]
    pub async fn retrieve_with_embedding(
        &self,
        query: &str,
        embedding: Vec<f32>,
        top_k: usize,
        filter: Option<&PayloadFilter>,
    ) -> RetrievalResult<Vec<RankedCandidate>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let fetch = self.config.fetch_size(top_k);

        let dense = self
            .index
            .search(&self.config.collection_name, embedding, fetch as u64, filter)
            .await?;

        let sparse: Vec<String> = match &self.lexical {
            Some(lexical) => lexical
                .top_n(query, fetch)
                .into_iter()
                .map(|(id, _)| id)
                .collect(),
            None => Vec::new(),
        };

        debug!(
            dense = dense.len(),
            sparse = sparse.len(),
            lexical = self.lexical.is_some(),
            "Candidate lists collected"
        );

        let dense_ids: Vec<&str> = dense.iter().map(|d| d.id.as_str()).collect();
        let fused = reciprocal_rank_fusion(&dense_ids, &sparse);

        let mut dense_by_id: HashMap<String, ScoredDocument> =
            dense.into_iter().map(|d| (d.id.clone(), d)).collect();

        let pool_size = match self.scorer {
            Some(_) => self.config.rerank_pool(top_k),
            None => top_k,
        };

        let mut pool = self
            .resolve_pool(fused, &mut dense_by_id, pool_size, filter)
            .await;

        if let Some(scorer) = &self.scorer {
            rerank(scorer.as_ref(), query, &mut pool);
        }

        pool.truncate(top_k);
        debug!(returned = pool.len(), "Retrieval complete");
        Ok(pool)
    }

    /// Attaches payloads in fused order until `pool_size` candidates are collected.
    async fn resolve_pool(
        &self,
        fused: Vec<FusedCandidate>,
        dense_by_id: &mut HashMap<String, ScoredDocument>,
        pool_size: usize,
        filter: Option<&PayloadFilter>,
    ) -> Vec<RankedCandidate> {
        let fused_total = fused.len();
        let mut pool = Vec::with_capacity(pool_size.min(fused_total));
        let mut represented: HashSet<String> = dense_by_id.keys().cloned().collect();
        let mut excluded = 0usize;
        let mut aliases = 0usize;
        let mut degraded = 0usize;

        for candidate in fused {
            if pool.len() >= pool_size {
                break;
            }

            let (payload, is_degraded) = match dense_by_id.remove(&candidate.id) {
                Some(doc) => (doc.payload, false),
                None => match self.resolve_sparse(&candidate.id, filter).await {
                    Resolution::Found(doc) => {
                        // A filename key resolving to an already ranked point is an alias.
                        if !represented.insert(doc.id.clone()) {
                            aliases += 1;
                            continue;
                        }
                        (doc.payload, false)
                    }
                    Resolution::Excluded => {
                        excluded += 1;
                        continue;
                    }
                    Resolution::Unresolved => {
                        degraded += 1;
                        (DocumentPayload::default(), true)
                    }
                },
            };

            pool.push(RankedCandidate {
                score: candidate.score as f32,
                fused_score: candidate.score,
                dense_rank: candidate.dense_rank,
                sparse_rank: candidate.sparse_rank,
                id: candidate.id,
                payload,
                degraded: is_degraded,
            });
        }

        if degraded > 0 {
            warn!(degraded, "Lexical candidates kept without payload");
        }
        debug!(
            fused = fused_total,
            pooled = pool.len(),
            excluded,
            aliases,
            "Fusion pool built"
        );
        pool
    }

    /// Looks a lexical-only candidate up by point id, then by `source == id`.
    async fn resolve_sparse(&self, id: &str, filter: Option<&PayloadFilter>) -> Resolution {
        let collection = &self.config.collection_name;
        let active_filter = filter.filter(|f| !f.is_empty());

        match self.index.retrieve_by_id(collection, id).await {
            Ok(Some(doc)) => {
                return if active_filter.is_none_or(|f| f.matches(&doc.payload)) {
                    Resolution::Found(doc)
                } else {
                    Resolution::Excluded
                };
            }
            Ok(None) => {}
            Err(e) => warn!(id, error = %e, "Lookup by id failed"),
        }

        let by_source = PayloadFilter::new().must("source", id);
        let scoped = match active_filter {
            Some(f) => f.and(&by_source),
            None => by_source.clone(),
        };

        match self.index.scroll_by_filter(collection, &scoped, 1).await {
            Ok(docs) => {
                if let Some(doc) = docs.into_iter().next() {
                    return Resolution::Found(doc);
                }
            }
            Err(e) => {
                warn!(id, error = %e, "Lookup by source failed");
                return Resolution::Unresolved;
            }
        }

        // Distinguish "filtered out" from "not in the index".
        if active_filter.is_some() {
            match self.index.scroll_by_filter(collection, &by_source, 1).await {
                Ok(docs) if !docs.is_empty() => return Resolution::Excluded,
                Ok(_) => {}
                Err(e) => warn!(id, error = %e, "Unfiltered lookup by source failed"),
            }
        }

        Resolution::Unresolved
    }
}

/// Re-sorts `pool` by pointwise score. On scorer failure the fused order stands.
fn rerank(scorer: &dyn PointwiseScorer, query: &str, pool: &mut Vec<RankedCandidate>) {
    if pool.is_empty() {
        return;
    }

    let texts: Vec<&str> = pool.iter().map(|c| c.text()).collect();
    let scores = match scorer.score_batch(query, &texts) {
        Ok(scores) if scores.len() == pool.len() => scores,
        Ok(scores) => {
            warn!(
                expected = pool.len(),
                got = scores.len(),
                "Reranker returned wrong number of scores, keeping fused order"
            );
            return;
        }
        Err(e) => {
            warn!(error = %e, "Reranking failed, keeping fused order");
            return;
        }
    };

    for (candidate, score) in pool.iter_mut().zip(scores) {
        candidate.score = score;
    }
    pool.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!(pool = pool.len(), "Reranked");
}
