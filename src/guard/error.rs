use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("safety classifier request to {url} failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("safety classifier returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("malformed safety classifier response: {reason}")]
    MalformedResponse { reason: String },
}

pub type GuardResult<T> = Result<T, GuardError>;
