//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAG_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::access::{AccessMode, DEFAULT_CERBOS_URL};
use crate::cache::{DEFAULT_CACHE_CAPACITY, SemanticCacheConfig};
use crate::constants::{
    DEFAULT_CACHE_THRESHOLD, DEFAULT_CACHE_TTL_SECS, DEFAULT_COLLECTION_NAME,
    DEFAULT_CONTEXT_CHAR_BUDGET, DEFAULT_EMBEDDING_DIM, DEFAULT_OVERFETCH_MULTIPLIER,
    DEFAULT_RERANK_POOL_MULTIPLIER, DEFAULT_TOP_K, DimConfig,
};
use crate::embedding::{DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL, RerankerConfig};
use crate::generation::DEFAULT_GENERATION_MODEL;
use crate::guard::DEFAULT_GUARD_MODEL;
use crate::pipeline::PipelineConfig;
use crate::retrieval::RetrieverConfig;
use crate::vectordb::PrefilterPolicy;

/// Default Qdrant URL (gRPC) used when `RAG_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default lexical snapshot location.
pub const DEFAULT_LEXICAL_PATH: &str = "bm25_corpus.json";

/// Deployment profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// No safety classification.
    #[default]
    Base,
    /// Input and output pass through the safety classifier.
    Guardrails,
}

impl Profile {
    pub fn guarded(self) -> bool {
        matches!(self, Profile::Guardrails)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Profile::Base => "base",
            Profile::Guardrails => "guardrails",
        })
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Profile::Base),
            "guardrails" => Ok(Profile::Guardrails),
            _ => Err(ConfigError::InvalidProfile {
                value: s.to_string(),
            }),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAG_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,
    /// Default: `legal_docs`.
    pub collection: String,
    /// Ollama endpoint for embeddings and the safety classifier.
    pub ollama_url: String,
    pub embed_model: String,
    pub generation_model: String,
    pub guard_model: String,
    pub cerbos_url: String,

    /// Lexical snapshot file; a missing file means dense-only retrieval.
    pub lexical_path: PathBuf,
    /// Cross-encoder model directory (config.json, model.safetensors, tokenizer.json).
    pub reranker_path: Option<PathBuf>,

    pub tenant: String,
    pub role: String,
    pub profile: Profile,
    pub access_mode: AccessMode,
    /// Roles cleared for confidential chunks. Default: `manager`.
    pub confidential_roles: Vec<String>,

    pub cache_threshold: f32,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,

    pub top_k: usize,
    pub overfetch_multiplier: usize,
    pub rerank_pool_multiplier: usize,
    pub context_char_budget: usize,
    pub embedding_dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            guard_model: DEFAULT_GUARD_MODEL.to_string(),
            cerbos_url: DEFAULT_CERBOS_URL.to_string(),
            lexical_path: PathBuf::from(DEFAULT_LEXICAL_PATH),
            reranker_path: None,
            tenant: "demo".to_string(),
            role: "employee".to_string(),
            profile: Profile::default(),
            access_mode: AccessMode::default(),
            confidential_roles: PrefilterPolicy::default().confidential_roles,
            cache_threshold: DEFAULT_CACHE_THRESHOLD,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            top_k: DEFAULT_TOP_K,
            overfetch_multiplier: DEFAULT_OVERFETCH_MULTIPLIER,
            rerank_pool_multiplier: DEFAULT_RERANK_POOL_MULTIPLIER,
            context_char_budget: DEFAULT_CONTEXT_CHAR_BUDGET,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "RAG_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "RAG_COLLECTION";
    const ENV_OLLAMA_URL: &'static str = "RAG_OLLAMA_URL";
    const ENV_EMBED_MODEL: &'static str = "RAG_EMBED_MODEL";
    const ENV_GENERATION_MODEL: &'static str = "RAG_GENERATION_MODEL";
    const ENV_GUARD_MODEL: &'static str = "RAG_GUARD_MODEL";
    const ENV_CERBOS_URL: &'static str = "RAG_CERBOS_URL";
    const ENV_LEXICAL_PATH: &'static str = "RAG_LEXICAL_PATH";
    const ENV_RERANKER_PATH: &'static str = "RAG_RERANKER_PATH";
    const ENV_TENANT: &'static str = "RAG_TENANT";
    const ENV_ROLE: &'static str = "RAG_ROLE";
    const ENV_PROFILE: &'static str = "RAG_PROFILE";
    const ENV_ACCESS_MODE: &'static str = "RAG_ACCESS_MODE";
    const ENV_CONFIDENTIAL_ROLES: &'static str = "RAG_CONFIDENTIAL_ROLES";
    const ENV_CACHE_THRESHOLD: &'static str = "RAG_CACHE_THRESHOLD";
    const ENV_CACHE_TTL_SECS: &'static str = "RAG_CACHE_TTL_SECS";
    const ENV_CACHE_CAPACITY: &'static str = "RAG_CACHE_CAPACITY";
    const ENV_TOP_K: &'static str = "RAG_TOP_K";
    const ENV_OVERFETCH: &'static str = "RAG_OVERFETCH_MULTIPLIER";
    const ENV_RERANK_POOL: &'static str = "RAG_RERANK_POOL_MULTIPLIER";
    const ENV_CONTEXT_CHARS: &'static str = "RAG_CONTEXT_CHARS";
    const ENV_EMBEDDING_DIM: &'static str = "RAG_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();

        let profile = match Self::read(Self::ENV_PROFILE) {
            Some(v) => v.parse()?,
            None => d.profile,
        };
        let access_mode = match Self::read(Self::ENV_ACCESS_MODE) {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::InvalidAccessMode { value: v })?,
            None => d.access_mode,
        };
        let confidential_roles = match Self::read(Self::ENV_CONFIDENTIAL_ROLES) {
            Some(v) => PrefilterPolicy::with_confidential_roles(v.split(',')).confidential_roles,
            None => d.confidential_roles,
        };

        Ok(Self {
            qdrant_url: Self::string(Self::ENV_QDRANT_URL, d.qdrant_url),
            collection: Self::string(Self::ENV_COLLECTION, d.collection),
            ollama_url: Self::string(Self::ENV_OLLAMA_URL, d.ollama_url),
            embed_model: Self::string(Self::ENV_EMBED_MODEL, d.embed_model),
            generation_model: Self::string(Self::ENV_GENERATION_MODEL, d.generation_model),
            guard_model: Self::string(Self::ENV_GUARD_MODEL, d.guard_model),
            cerbos_url: Self::string(Self::ENV_CERBOS_URL, d.cerbos_url),
            lexical_path: Self::read(Self::ENV_LEXICAL_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.lexical_path),
            reranker_path: Self::read(Self::ENV_RERANKER_PATH).map(PathBuf::from),
            tenant: Self::string(Self::ENV_TENANT, d.tenant).to_lowercase(),
            role: Self::string(Self::ENV_ROLE, d.role).to_lowercase(),
            profile,
            access_mode,
            confidential_roles,
            cache_threshold: Self::number(Self::ENV_CACHE_THRESHOLD, d.cache_threshold, "number")?,
            cache_ttl_secs: Self::number(Self::ENV_CACHE_TTL_SECS, d.cache_ttl_secs, "integer")?,
            cache_capacity: Self::number(Self::ENV_CACHE_CAPACITY, d.cache_capacity, "integer")?,
            top_k: Self::number(Self::ENV_TOP_K, d.top_k, "integer")?,
            overfetch_multiplier: Self::number(
                Self::ENV_OVERFETCH,
                d.overfetch_multiplier,
                "integer",
            )?,
            rerank_pool_multiplier: Self::number(
                Self::ENV_RERANK_POOL,
                d.rerank_pool_multiplier,
                "integer",
            )?,
            context_char_budget: Self::number(
                Self::ENV_CONTEXT_CHARS,
                d.context_char_budget,
                "integer",
            )?,
            embedding_dim: Self::number(Self::ENV_EMBEDDING_DIM, d.embedding_dim, "integer")?,
        })
    }

    /// Validates ranges and paths (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("qdrant_url", &self.qdrant_url),
            ("collection", &self.collection),
            ("tenant", &self.tenant),
            ("role", &self.role),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { name });
            }
        }

        if !(0.0..=1.0).contains(&self.cache_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "cache_threshold",
                reason: format!("{} is not within [0, 1]", self.cache_threshold),
            });
        }

        for (name, value) in [
            ("cache_ttl_secs", self.cache_ttl_secs),
            ("cache_capacity", self.cache_capacity),
            ("top_k", self.top_k as u64),
            ("overfetch_multiplier", self.overfetch_multiplier as u64),
            ("rerank_pool_multiplier", self.rerank_pool_multiplier as u64),
            ("context_char_budget", self.context_char_budget as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    reason: "must be > 0".to_string(),
                });
            }
        }

        self.dim_config()
            .validate()
            .map_err(|e| ConfigError::OutOfRange {
                name: "embedding_dim",
                reason: e.to_string(),
            })?;

        if self.lexical_path.exists() && !self.lexical_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.lexical_path.clone(),
            });
        }

        if let Some(ref path) = self.reranker_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn dim_config(&self) -> DimConfig {
        DimConfig::new(self.embedding_dim)
    }

    pub fn prefilter_policy(&self) -> PrefilterPolicy {
        PrefilterPolicy::with_confidential_roles(&self.confidential_roles)
    }

    pub fn retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig::default()
            .collection_name(&self.collection)
            .overfetch_multiplier(self.overfetch_multiplier)
            .rerank_pool_multiplier(self.rerank_pool_multiplier)
    }

    pub fn cache_config(&self) -> SemanticCacheConfig {
        SemanticCacheConfig::default()
            .with_threshold(self.cache_threshold)
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
    }

    /// Cross-encoder settings, or `None` when no model directory is configured.
    pub fn reranker_config(&self) -> Option<RerankerConfig> {
        self.reranker_path.as_ref().map(RerankerConfig::new)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_top_k(self.top_k)
            .with_context_char_budget(self.context_char_budget)
            .with_access_mode(self.access_mode)
            .with_prefilter(self.prefilter_policy())
    }

    /// Trimmed, non-empty value of `var_name`.
    fn read(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(var_name: &str, default: String) -> String {
        Self::read(var_name).unwrap_or(default)
    }

    fn number<T: FromStr>(
        name: &'static str,
        default: T,
        expected: &'static str,
    ) -> Result<T, ConfigError> {
        match Self::read(name) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name,
                value,
                expected,
            }),
            None => Ok(default),
        }
    }
}
