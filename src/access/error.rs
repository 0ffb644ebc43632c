use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    /// The client does not offer this capability.
    #[error("authorization client does not support {capability}")]
    Unsupported { capability: &'static str },

    #[error("authorization request to {url} failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("authorization service returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("malformed authorization response: {reason}")]
    MalformedResponse { reason: String },

    #[error("invalid access mode: {value} (expected permissive or strict)")]
    InvalidMode { value: String },
}

pub type AccessResult<T> = Result<T, AccessError>;
