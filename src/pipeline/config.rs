use crate::access::AccessMode;
use crate::constants::{DEFAULT_CONTEXT_CHAR_BUDGET, DEFAULT_TOP_K};
use crate::vectordb::PrefilterPolicy;

use super::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub top_k: usize,
    /// Characters of each document's text placed in the prompt context.
    pub context_char_budget: usize,
    pub access_mode: AccessMode,
    /// Authorization action checked for every candidate.
    pub action: String,
    pub principal_id: String,
    pub resource_kind: String,
    pub prefilter: PrefilterPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            context_char_budget: DEFAULT_CONTEXT_CHAR_BUDGET,
            access_mode: AccessMode::default(),
            action: "read".to_string(),
            principal_id: "user".to_string(),
            resource_kind: "document".to_string(),
            prefilter: PrefilterPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_context_char_budget(mut self, budget: usize) -> Self {
        self.context_char_budget = budget;
        self
    }

    pub fn with_access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    pub fn with_prefilter(mut self, policy: PrefilterPolicy) -> Self {
        self.prefilter = policy;
        self
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.top_k == 0 {
            return Err(PipelineError::ConfigError {
                reason: "top_k must be > 0".to_string(),
            });
        }
        if self.context_char_budget == 0 {
            return Err(PipelineError::ConfigError {
                reason: "context_char_budget must be > 0".to_string(),
            });
        }
        for (name, value) in [
            ("action", &self.action),
            ("principal_id", &self.principal_id),
            ("resource_kind", &self.resource_kind),
        ] {
            if value.trim().is_empty() {
                return Err(PipelineError::ConfigError {
                    reason: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }
}
