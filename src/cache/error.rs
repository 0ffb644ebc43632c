use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the semantic cache and its stores.
pub enum CacheError {
    /// The backing store rejected or failed the operation.
    #[error("cache store error: {message}")]
    Store { message: String },

    /// Entry fields could not be encoded.
    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),

    /// A key pattern could not be compiled.
    #[error("invalid key pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Invalid configuration.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;
