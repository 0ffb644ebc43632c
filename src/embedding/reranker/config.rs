use std::path::PathBuf;

use super::error::RerankerError;

/// Position limit of MiniLM / BERT-base cross-encoders.
pub const MAX_SEQ_LEN: usize = 512;

/// Reranker settings. Without a model path the reranker scores by term overlap.
#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: Option<PathBuf>,
    pub max_seq_len: usize,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl RerankerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn validate(&self) -> Result<(), RerankerError> {
        if self.max_seq_len == 0 {
            return Err(RerankerError::InvalidConfig {
                reason: "max_seq_len must be non-zero".to_string(),
            });
        }
        if self
            .model_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(RerankerError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }
        Ok(())
    }
}
