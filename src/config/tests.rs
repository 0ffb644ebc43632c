use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const VARS: [&str; 22] = [
    "RAG_QDRANT_URL",
    "RAG_COLLECTION",
    "RAG_OLLAMA_URL",
    "RAG_EMBED_MODEL",
    "RAG_GENERATION_MODEL",
    "RAG_GUARD_MODEL",
    "RAG_CERBOS_URL",
    "RAG_LEXICAL_PATH",
    "RAG_RERANKER_PATH",
    "RAG_TENANT",
    "RAG_ROLE",
    "RAG_PROFILE",
    "RAG_ACCESS_MODE",
    "RAG_CONFIDENTIAL_ROLES",
    "RAG_CACHE_THRESHOLD",
    "RAG_CACHE_TTL_SECS",
    "RAG_CACHE_CAPACITY",
    "RAG_TOP_K",
    "RAG_OVERFETCH_MULTIPLIER",
    "RAG_RERANK_POOL_MULTIPLIER",
    "RAG_CONTEXT_CHARS",
    "RAG_EMBEDDING_DIM",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_rag_env();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_rag_env();
    result
}

fn clear_rag_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "legal_docs");
    assert_eq!(config.embed_model, "nomic-embed-text");
    assert_eq!(config.generation_model, "llama3.2");
    assert_eq!(config.guard_model, "llama-guard3");
    assert_eq!(config.cerbos_url, "http://localhost:3592");
    assert_eq!(config.lexical_path, PathBuf::from("bm25_corpus.json"));
    assert!(config.reranker_path.is_none());
    assert_eq!(config.tenant, "demo");
    assert_eq!(config.role, "employee");
    assert_eq!(config.profile, Profile::Base);
    assert_eq!(config.access_mode, AccessMode::Permissive);
    assert_eq!(config.confidential_roles, vec!["manager"]);
    assert_eq!(config.cache_threshold, 0.95);
    assert_eq!(config.cache_ttl_secs, 360);
    assert_eq!(config.top_k, 5);
    assert_eq!(config.overfetch_multiplier, 3);
    assert_eq!(config.rerank_pool_multiplier, 4);
    assert_eq!(config.context_char_budget, 400);
    assert_eq!(config.embedding_dim, 768);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    let config = with_env_vars(&[], Config::from_env).expect("should parse with defaults");
    assert_eq!(config.top_k, 5);
    assert_eq!(config.profile, Profile::Base);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("RAG_TENANT", " ACME "),
            ("RAG_ROLE", " Manager "),
            ("RAG_PROFILE", "GUARDRAILS"),
            ("RAG_ACCESS_MODE", "strict"),
            ("RAG_CONFIDENTIAL_ROLES", "manager, HR ,"),
            ("RAG_CACHE_THRESHOLD", "0.9"),
            ("RAG_CACHE_TTL_SECS", "60"),
            ("RAG_TOP_K", "8"),
            ("RAG_COLLECTION", "contracts"),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.tenant, "acme");
    assert_eq!(config.role, "manager");
    assert!(config.profile.guarded());
    assert_eq!(config.access_mode, AccessMode::Strict);
    assert_eq!(config.confidential_roles, vec!["manager", "hr"]);
    assert_eq!(config.cache_threshold, 0.9);
    assert_eq!(config.cache_ttl_secs, 60);
    assert_eq!(config.top_k, 8);
    assert_eq!(config.collection, "contracts");
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    let config = with_env_vars(
        &[("RAG_TENANT", "   "), ("RAG_RERANKER_PATH", "")],
        Config::from_env,
    )
    .unwrap();
    assert_eq!(config.tenant, "demo");
    assert!(config.reranker_path.is_none());
}

#[test]
#[serial]
fn test_invalid_number() {
    let err = with_env_vars(&[("RAG_TOP_K", "five")], Config::from_env).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidNumber {
            name: "RAG_TOP_K",
            ..
        }
    ));

    let err = with_env_vars(&[("RAG_CACHE_THRESHOLD", "high")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { .. }));
}

#[test]
#[serial]
fn test_invalid_profile_and_mode() {
    let err = with_env_vars(&[("RAG_PROFILE", "paranoid")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProfile { .. }));

    let err = with_env_vars(&[("RAG_ACCESS_MODE", "lenient")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAccessMode { .. }));
}

#[test]
fn test_validate_ranges() {
    let config = Config {
        cache_threshold: 1.2,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::OutOfRange {
            name: "cache_threshold",
            ..
        }
    ));

    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        embedding_dim: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::OutOfRange {
            name: "embedding_dim",
            ..
        }
    ));

    let config = Config {
        tenant: " ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::Empty { name: "tenant" }
    ));
}

#[test]
fn test_validate_paths() {
    let dir = tempfile::tempdir().unwrap();

    let config = Config {
        reranker_path: Some(dir.path().join("missing")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::PathNotFound { .. }
    ));

    let file = dir.path().join("model.bin");
    std::fs::write(&file, b"x").unwrap();
    let config = Config {
        reranker_path: Some(file),
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::NotADirectory { .. }
    ));

    let config = Config {
        lexical_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::NotAFile { .. }
    ));

    let config = Config {
        reranker_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_component_configs() {
    let config = Config {
        collection: "contracts".to_string(),
        overfetch_multiplier: 2,
        cache_ttl_secs: 10,
        top_k: 3,
        access_mode: AccessMode::Strict,
        confidential_roles: vec!["hr".to_string()],
        ..Default::default()
    };

    let retriever = config.retriever_config();
    assert_eq!(retriever.collection_name, "contracts");
    assert_eq!(retriever.fetch_size(3), 6);

    assert_eq!(config.cache_config().ttl, Duration::from_secs(10));

    let pipeline = config.pipeline_config();
    assert_eq!(pipeline.top_k, 3);
    assert_eq!(pipeline.access_mode, AccessMode::Strict);
    assert!(pipeline.prefilter.allows_confidential("HR"));
    assert!(!pipeline.prefilter.allows_confidential("manager"));

    assert!(config.reranker_config().is_none());
}

#[test]
fn test_reranker_config_only_with_model_path() {
    let config = Config {
        reranker_path: Some(PathBuf::from("/models/ms-marco")),
        ..Default::default()
    };
    let reranker = config.reranker_config().expect("model path configured");
    assert_eq!(
        reranker.model_path.as_deref(),
        Some(std::path::Path::new("/models/ms-marco"))
    );
}

#[test]
fn test_profile_parse() {
    assert_eq!("base".parse::<Profile>().unwrap(), Profile::Base);
    assert_eq!(Profile::Guardrails.to_string(), "guardrails");
    assert!(!Profile::Base.guarded());
}
