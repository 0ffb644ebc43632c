use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::LexicalResult;
use super::snapshot::LexicalSnapshot;
use super::tokenizer::{Tokenize, WhitespaceTokenizer};

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f32,
    /// Length normalization strength.
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

struct IndexedDoc {
    id: String,
    len: usize,
    term_freqs: HashMap<String, u32>,
}

/// Read-only BM25 ranker over a static corpus snapshot.
pub struct LexicalIndex {
    docs: Vec<IndexedDoc>,
    idf: HashMap<String, f32>,
    avg_doc_len: f32,
    params: Bm25Params,
    tokenizer: Arc<dyn Tokenize>,
}

impl std::fmt::Debug for LexicalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalIndex")
            .field("docs", &self.docs.len())
            .field("terms", &self.idf.len())
            .field("avg_doc_len", &self.avg_doc_len)
            .field("params", &self.params)
            .finish()
    }
}

impl LexicalIndex {
    /// Builds an index with the default tokenizer and parameters.
    pub fn build(snapshot: &LexicalSnapshot) -> LexicalResult<Self> {
        Self::build_with(snapshot, Arc::new(WhitespaceTokenizer), Bm25Params::default())
    }

    /// Builds an index with an explicit tokenizer and parameters.
    pub fn build_with(
        snapshot: &LexicalSnapshot,
        tokenizer: Arc<dyn Tokenize>,
        params: Bm25Params,
    ) -> LexicalResult<Self> {
        snapshot.validate()?;

        let mut docs = Vec::with_capacity(snapshot.len());
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();
        let mut total_len = 0usize;

        for (text, id) in snapshot.corpus.iter().zip(snapshot.doc_ids.iter()) {
            let terms = tokenizer.tokenize(text);
            total_len += terms.len();

            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for term in &terms {
                *term_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            for term in term_freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }

            docs.push(IndexedDoc {
                id: id.clone(),
                len: terms.len(),
                term_freqs,
            });
        }

        let n = docs.len() as f32;
        let idf = doc_freqs
            .into_iter()
            .map(|(term, df)| {
                let df = df as f32;
                (term, (1.0 + (n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f32 / n
        };

        debug!(
            docs = docs.len(),
            avg_doc_len = avg_doc_len,
            "Lexical index built"
        );

        Ok(Self {
            docs,
            idf,
            avg_doc_len,
            params,
            tokenizer,
        })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Scores `query` against every document, ordered by descending score.
    ///
    /// Ties keep snapshot order. The caller truncates.
    pub fn score(&self, query: &str) -> Vec<(String, f32)> {
        let terms = self.tokenizer.tokenize(query);

        let mut scored: Vec<(String, f32)> = self
            .docs
            .iter()
            .map(|doc| (doc.id.clone(), self.score_doc(doc, &terms)))
            .collect();

        // sort_by is stable, which preserves snapshot order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }

    /// Returns at most `n` documents with a positive score.
    pub fn top_n(&self, query: &str, n: usize) -> Vec<(String, f32)> {
        let mut scored = self.score(query);
        scored.retain(|(_, s)| *s > 0.0);
        scored.truncate(n);
        scored
    }

    fn score_doc(&self, doc: &IndexedDoc, terms: &[String]) -> f32 {
        if self.avg_doc_len == 0.0 {
            return 0.0;
        }

        let Bm25Params { k1, b } = self.params;
        let norm = k1 * (1.0 - b + b * doc.len as f32 / self.avg_doc_len);

        terms
            .iter()
            .filter_map(|term| {
                let tf = *doc.term_freqs.get(term)? as f32;
                let idf = self.idf.get(term).copied().unwrap_or(0.0);
                Some(idf * (tf * (k1 + 1.0)) / (tf + norm))
            })
            .sum()
    }
}
