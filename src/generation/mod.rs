//! Answer generation from retrieved context.

mod chat;
mod error;
pub mod prompt;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use chat::{DEFAULT_GENERATION_MODEL, GenaiGenerator};
pub use error::{GenerationError, GenerationResult};
pub use prompt::{SYSTEM_PROMPT, render_user_prompt};

#[async_trait]
pub trait Generator: Send + Sync {
    /// Answers `question` using only `context`.
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String>;
}
