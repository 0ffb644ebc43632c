use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{GuardError, GuardResult};

pub const DEFAULT_GUARD_MODEL: &str = "llama-guard3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    Safe,
    Unsafe,
}

impl SafetyVerdict {
    pub fn is_safe(self) -> bool {
        matches!(self, SafetyVerdict::Safe)
    }

    /// Llama Guard answers `safe` or `unsafe\n<categories>`.
    pub fn from_response(raw: &str) -> Self {
        if raw.to_lowercase().contains("unsafe") {
            SafetyVerdict::Unsafe
        } else {
            SafetyVerdict::Safe
        }
    }
}

#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> GuardResult<SafetyVerdict>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Llama Guard served by Ollama (`POST /api/generate`, non-streaming).
#[derive(Debug, Clone)]
pub struct LlamaGuardClassifier {
    http: HttpClient,
    base_url: String,
    model: String,
}

impl LlamaGuardClassifier {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SafetyClassifier for LlamaGuardClassifier {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn classify(&self, text: &str) -> GuardResult<SafetyVerdict> {
        let url = format!("{}/api/generate", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: text,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GuardError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GuardError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            resp.json()
                .await
                .map_err(|e| GuardError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let verdict = SafetyVerdict::from_response(&parsed.response);
        debug!(?verdict, "Safety verdict");
        Ok(verdict)
    }
}

/// Classifier with a fixed verdict, flagging any text containing one of `blocked`.
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    blocked: Vec<String>,
}

impl StaticClassifier {
    pub fn blocking(terms: &[&str]) -> Self {
        Self {
            blocked: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl SafetyClassifier for StaticClassifier {
    async fn classify(&self, text: &str) -> GuardResult<SafetyVerdict> {
        let lowered = text.to_lowercase();
        if self.blocked.iter().any(|t| lowered.contains(t.as_str())) {
            Ok(SafetyVerdict::Unsafe)
        } else {
            Ok(SafetyVerdict::Safe)
        }
    }
}
