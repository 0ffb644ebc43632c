//! Pointwise (query, passage) relevance scoring.

pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertCrossEncoder;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_pair_tokenizer;

/// Scores a single (query, passage) pair; higher means more relevant.
///
/// Scores are only compared with each other, never against a fixed threshold.
pub trait PointwiseScorer: Send + Sync {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError>;

    fn score_batch(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, RerankerError> {
        passages.iter().map(|p| self.score(query, p)).collect()
    }
}

struct LoadedModel {
    model: BertCrossEncoder,
    tokenizer: Tokenizer,
}

/// Cross-encoder reranker; falls back to term-overlap scoring without a model.
pub struct Reranker {
    device: Device,
    config: RerankerConfig,
    loaded: Option<LoadedModel>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.loaded.is_some())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        let Some(model_path) = config.model_path.clone() else {
            info!("No reranker model configured, scoring by term overlap");
            return Ok(Self {
                device,
                config,
                loaded: None,
            });
        };

        for required in ["config.json", "model.safetensors"] {
            if !model_path.join(required).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("missing {} in {}", required, model_path.display()),
                });
            }
        }

        info!(model_path = %model_path.display(), "Loading cross-encoder");

        let model = BertCrossEncoder::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("failed to load cross-encoder: {e}"),
            }
        })?;
        let tokenizer = load_pair_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        Ok(Self {
            device,
            config,
            loaded: Some(LoadedModel { model, tokenizer }),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    /// Returns `(index, score)` pairs, best first. Equal scores keep input order.
    pub fn rerank(
        &self,
        query: &str,
        passages: &[&str],
    ) -> Result<Vec<(usize, f32)>, RerankerError> {
        let mut scored: Vec<(usize, f32)> = self
            .score_batch(query, passages)?
            .into_iter()
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored)
    }

    fn model_score(
        &self,
        loaded: &LoadedModel,
        query: &str,
        passage: &str,
    ) -> Result<f32, RerankerError> {
        let encoding = loaded.tokenizer.encode((query, passage), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let row = |data: &[u32]| -> Result<Tensor, RerankerError> {
            Ok(Tensor::new(data, &self.device)?.unsqueeze(0)?)
        };
        let input_ids = row(encoding.get_ids())?;
        let type_ids = row(encoding.get_type_ids())?;
        let attention_mask = row(encoding.get_attention_mask())?;

        let logits = loaded
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))?;
        logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "model returned no logits".to_string(),
            })
    }
}

impl PointwiseScorer for Reranker {
    fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        match &self.loaded {
            Some(loaded) => self.model_score(loaded, query, passage),
            None => Ok(overlap_score(query, passage)),
        }
    }
}

fn content_terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Share of query content terms found in the passage, in `[0, 1]`.
///
/// Terms of two characters or fewer are ignored. Ties are broken towards shorter
/// passages by a small Dice-coefficient component.
fn overlap_score(query: &str, passage: &str) -> f32 {
    let q = content_terms(query);
    if q.is_empty() {
        return 0.0;
    }
    let p = content_terms(passage);
    let shared = q.intersection(&p).count() as f32;
    let coverage = shared / q.len() as f32;
    let dice = 2.0 * shared / (q.len() + p.len()) as f32;
    (0.8 * coverage + 0.2 * dice).clamp(0.0, 1.0)
}
