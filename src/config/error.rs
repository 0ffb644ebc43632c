//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("invalid value for {name}: '{value}' is not a valid {expected}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid profile '{value}': expected base or guardrails")]
    InvalidProfile { value: String },

    #[error("invalid access mode '{value}': expected permissive or strict")]
    InvalidAccessMode { value: String },

    /// A value parsed but is outside its allowed range.
    #[error("{name} is out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
