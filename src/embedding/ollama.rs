use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{EmbeddingError, EmbeddingResult};
use super::Embedder;
use crate::constants::DEFAULT_EMBEDDING_DIM;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct EmbeddingResponse {
    #[serde(default)]
    pub(crate) embedding: Vec<f32>,
}

/// Embeddings served by an Ollama instance (`POST /api/embeddings`).
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    http: HttpClient,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
        }
    }

    /// Expected output dimension; responses of any other length are rejected.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }
}

pub(crate) fn decode_embedding(
    response: EmbeddingResponse,
    expected: usize,
) -> EmbeddingResult<Vec<f32>> {
    if response.embedding.is_empty() {
        return Err(EmbeddingError::MalformedResponse {
            reason: "empty embedding".to_string(),
        });
    }
    if response.embedding.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: response.embedding.len(),
        });
    }
    if response.embedding.iter().any(|x| !x.is_finite()) {
        return Err(EmbeddingError::MalformedResponse {
            reason: "non-finite component".to_string(),
        });
    }
    Ok(response.embedding)
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let url = self.endpoint();
        let resp = self
            .http
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse =
            resp.json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let embedding = decode_embedding(parsed, self.dimension)?;
        debug!(dim = embedding.len(), "Embedding received");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
