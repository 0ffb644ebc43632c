//! Reciprocal rank fusion of dense and lexical rankings.
//!
//! `score(d) = Σ 1 / (k + rank_m(d))` over the modalities `m` whose (truncated) list
//! contains `d`, with 1-based ranks. A modality that does not contain `d` adds nothing.
//!
//! Ordering: descending score, then better dense rank (documents absent from the dense
//! list come last), then first-seen order (dense list first, then lexical).

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::constants::RRF_K;

/// A document surfaced by at least one modality.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
    pub id: String,
    pub score: f64,
    /// 1-based rank in the dense list.
    pub dense_rank: Option<usize>,
    /// 1-based rank in the lexical list.
    pub sparse_rank: Option<usize>,
}

impl FusedCandidate {
    pub fn is_sparse_only(&self) -> bool {
        self.dense_rank.is_none()
    }
}

/// Fuses two rankings with the standard constant `k = 60`.
pub fn reciprocal_rank_fusion<D, S>(dense: &[D], sparse: &[S]) -> Vec<FusedCandidate>
where
    D: AsRef<str>,
    S: AsRef<str>,
{
    reciprocal_rank_fusion_with_k(dense, sparse, RRF_K)
}

/// Fuses two rankings with an explicit `k`.
///
/// A document repeated within one list only counts at its best rank.
pub fn reciprocal_rank_fusion_with_k<D, S>(dense: &[D], sparse: &[S], k: f64) -> Vec<FusedCandidate>
where
    D: AsRef<str>,
    S: AsRef<str>,
{
    let mut fused: Vec<FusedCandidate> = Vec::with_capacity(dense.len() + sparse.len());
    let mut position: HashMap<String, usize> = HashMap::new();

    for (idx, id) in dense.iter().enumerate() {
        let id = id.as_ref();
        if position.contains_key(id) {
            continue;
        }
        let rank = idx + 1;
        position.insert(id.to_string(), fused.len());
        fused.push(FusedCandidate {
            id: id.to_string(),
            score: 1.0 / (k + rank as f64),
            dense_rank: Some(rank),
            sparse_rank: None,
        });
    }

    for (idx, id) in sparse.iter().enumerate() {
        let id = id.as_ref();
        let rank = idx + 1;
        match position.get(id) {
            Some(&pos) => {
                let candidate = &mut fused[pos];
                if candidate.sparse_rank.is_none() {
                    candidate.sparse_rank = Some(rank);
                    candidate.score += 1.0 / (k + rank as f64);
                }
            }
            None => {
                position.insert(id.to_string(), fused.len());
                fused.push(FusedCandidate {
                    id: id.to_string(),
                    score: 1.0 / (k + rank as f64),
                    dense_rank: None,
                    sparse_rank: Some(rank),
                });
            }
        }
    }

    // Stable sort: equal score and dense rank keep first-seen order.
    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| cmp_dense_rank(a.dense_rank, b.dense_rank))
    });
    fused
}

fn cmp_dense_rank(a: Option<usize>, b: Option<usize>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
