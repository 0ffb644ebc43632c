use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, instrument};

use super::error::{GenerationError, GenerationResult};
use super::prompt::{SYSTEM_PROMPT, render_user_prompt};
use super::Generator;

pub const DEFAULT_GENERATION_MODEL: &str = "llama3.2";

/// Chat completion through `genai`; provider is resolved from the model name
/// (unprefixed local names go to Ollama).
#[derive(Clone)]
pub struct GenaiGenerator {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiGenerator {
    pub fn new(model: &str) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn build_request(context: &str, question: &str) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(render_user_prompt(context, question)),
    ])
}

#[async_trait]
impl Generator for GenaiGenerator {
    #[instrument(skip(self, context, question), fields(model = %self.model, context_len = context.len()))]
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String> {
        let response = self
            .client
            .exec_chat(&self.model, build_request(context, question), None)
            .await?;

        let text = response
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::EmptyResponse)?
            .to_string();
        debug!(answer_len = text.len(), "Generation complete");
        Ok(text)
    }
}
