use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("model returned no text")]
    EmptyResponse,
}

pub type GenerationResult<T> = Result<T, GenerationError>;

impl From<genai::Error> for GenerationError {
    fn from(err: genai::Error) -> Self {
        GenerationError::Provider(err.to_string())
    }
}
