//! Input/output safety classification and PII redaction.

mod classifier;
mod error;
mod redact;

#[cfg(test)]
mod tests;

pub use classifier::{
    DEFAULT_GUARD_MODEL, LlamaGuardClassifier, SafetyClassifier, SafetyVerdict, StaticClassifier,
};
pub use error::{GuardError, GuardResult};
pub use redact::{NoopRedactor, PatternRedactor, Redactor};
