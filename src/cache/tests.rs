use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::hashing::cache_key;

fn unit(seed: f32) -> Vec<f32> {
    let mut v = vec![seed, 1.0 - seed, 0.5, 0.25];
    crate::embedding::l2_normalize(&mut v);
    v
}

fn cache() -> SemanticCache<Arc<MemoryCacheStore>> {
    let store = Arc::new(MemoryCacheStore::new());
    SemanticCache::new(store, SemanticCacheConfig::default()).unwrap()
}

async fn store_answer(cache: &SemanticCache<Arc<MemoryCacheStore>>, tenant: &str, role: &str) {
    cache
        .set(
            "what is the notice period",
            &unit(0.3),
            "Thirty days.",
            &["termination.txt".to_string()],
            tenant,
            role,
            None,
        )
        .await
        .unwrap();
}

/// Store whose every call fails.
struct BrokenStore;

impl CacheStore for BrokenStore {
    async fn hset(&self, _key: &str, _fields: CacheFields, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Store {
            message: "connection reset".to_string(),
        })
    }

    async fn hgetall(&self, _key: &str) -> CacheResult<Option<CacheFields>> {
        Err(CacheError::Store {
            message: "connection reset".to_string(),
        })
    }

    async fn delete_matching(&self, _pattern: &str) -> CacheResult<u64> {
        Err(CacheError::Store {
            message: "connection reset".to_string(),
        })
    }
}

#[test]
fn test_config_validate() {
    assert!(SemanticCacheConfig::default().validate().is_ok());
    assert!(
        SemanticCacheConfig::default()
            .with_threshold(1.5)
            .validate()
            .is_err()
    );
    assert!(
        SemanticCacheConfig::default()
            .with_ttl(Duration::ZERO)
            .validate()
            .is_err()
    );
    let invalid = SemanticCacheConfig::default().with_threshold(-0.1);
    assert!(SemanticCache::new(MemoryCacheStore::new(), invalid).is_err());
}

#[test]
fn test_embedding_bytes() {
    let v = vec![0.5f32, -1.25, 3.0];
    let bytes = embedding_to_bytes(&v);
    assert_eq!(bytes.len(), 12);
    assert_eq!(embedding_from_bytes(&bytes), Some(v));
    assert_eq!(embedding_from_bytes(&bytes[..7]), None);
    assert_eq!(embedding_from_bytes(&[]), None);
}

#[tokio::test]
async fn test_set_then_get_is_hit() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;

    let hit = cache
        .get("what is the notice period", &unit(0.3), "acme", "employee")
        .await
        .unwrap()
        .expect("hit");
    assert_eq!(hit.answer, "Thirty days.");
    assert_eq!(hit.sources, vec!["termination.txt"]);
    assert!((hit.similarity - 1.0).abs() < 1e-5);
    assert_eq!(hit.cached_query, "what is the notice period");
}

#[tokio::test]
async fn test_tenant_and_role_are_normalized() {
    let cache = cache();
    store_answer(&cache, " ACME ", "Employee").await;

    let hit = cache
        .get("what is the notice period", &unit(0.3), "acme", "employee")
        .await
        .unwrap();
    assert!(hit.is_some());
}

#[tokio::test]
async fn test_other_tenant_misses() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;

    let miss = cache
        .get("what is the notice period", &unit(0.3), "globex", "employee")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_other_role_misses() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;

    let miss = cache
        .get("what is the notice period", &unit(0.3), "acme", "manager")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_below_threshold_misses_despite_key_match() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;

    let orthogonal = vec![0.5, -0.5, 0.5, -0.5];
    let miss = cache
        .get("what is the notice period", &orthogonal, "acme", "employee")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_threshold_boundary_is_inclusive() {
    let store = Arc::new(MemoryCacheStore::new());
    let cache = SemanticCache::new(store, SemanticCacheConfig::default().with_threshold(1.0)).unwrap();

    let v = vec![1.0, 0.0];
    cache.set("q", &v, "a", &[], "t", "r", None).await.unwrap();
    assert!(cache.get("q", &v, "t", "r").await.unwrap().is_some());
}

#[tokio::test]
async fn test_zero_norm_embedding_has_zero_similarity() {
    let permissive = SemanticCache::new(
        MemoryCacheStore::new(),
        SemanticCacheConfig::default().with_threshold(0.0),
    )
    .unwrap();
    permissive
        .set("q", &[1.0, 0.0], "a", &[], "t", "r", None)
        .await
        .unwrap();

    // similarity is 0.0, which still passes a 0.0 threshold.
    let hit = permissive
        .get("q", &[0.0, 0.0], "t", "r")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.similarity, 0.0);

    let strict = cache();
    strict
        .set("q", &[1.0, 0.0], "a", &[], "t", "r", None)
        .await
        .unwrap();
    assert!(strict.get("q", &[0.0, 0.0], "t", "r").await.unwrap().is_none());
}

#[tokio::test]
async fn test_dimension_mismatch_misses() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;

    let miss = cache
        .get("what is the notice period", &[1.0, 0.0], "acme", "employee")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_set_overwrites_existing_entry() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;
    cache
        .set(
            "what is the notice period",
            &unit(0.3),
            "Updated: sixty days.",
            &[],
            "acme",
            "employee",
            None,
        )
        .await
        .unwrap();

    let hit = cache
        .get("what is the notice period", &unit(0.3), "acme", "employee")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.answer, "Updated: sixty days.");
    assert!(hit.sources.is_empty());
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let cache = cache();
    cache
        .set(
            "short lived",
            &unit(0.1),
            "soon gone",
            &[],
            "acme",
            "employee",
            Some(Duration::from_millis(50)),
        )
        .await
        .unwrap();
    assert!(
        cache
            .get("short lived", &unit(0.1), "acme", "employee")
            .await
            .unwrap()
            .is_some()
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(
        cache
            .get("short lived", &unit(0.1), "acme", "employee")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_corrupt_embedding_is_a_miss_and_not_purged() {
    let store = Arc::new(MemoryCacheStore::new());
    let cache = SemanticCache::new(store.clone(), SemanticCacheConfig::default()).unwrap();

    let key = cache_key("acme", "employee", "broken");
    let mut fields = CacheFields::new();
    fields.insert("embedding".to_string(), vec![1, 2, 3]);
    fields.insert("answer".to_string(), b"stale".to_vec());
    store.hset(&key, fields, Duration::from_secs(60)).await.unwrap();

    let result = cache.get("broken", &unit(0.2), "acme", "employee").await.unwrap();
    assert!(result.is_none());
    assert!(store.contains_key(&key));
}

#[tokio::test]
async fn test_invalidate_by_tenant() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;
    store_answer(&cache, "acme", "manager").await;
    store_answer(&cache, "globex", "employee").await;

    assert_eq!(cache.invalidate(Some("ACME"), None).await.unwrap(), 2);
    assert!(
        cache
            .get("what is the notice period", &unit(0.3), "globex", "employee")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_invalidate_by_role() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;
    store_answer(&cache, "acme", "manager").await;
    store_answer(&cache, "globex", "employee").await;

    assert_eq!(cache.invalidate(None, Some("employee")).await.unwrap(), 2);
    assert!(
        cache
            .get("what is the notice period", &unit(0.3), "acme", "manager")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_invalidate_by_tenant_and_role() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;
    store_answer(&cache, "acme", "manager").await;

    assert_eq!(
        cache
            .invalidate(Some("acme"), Some("manager"))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_invalidate_everything() {
    let store = Arc::new(MemoryCacheStore::new());
    let cache = SemanticCache::new(store.clone(), SemanticCacheConfig::default()).unwrap();
    store_answer(&cache, "acme", "employee").await;
    store_answer(&cache, "globex", "manager").await;

    assert_eq!(cache.invalidate(None, None).await.unwrap(), 2);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_tenant_with_glob_characters_cannot_widen_invalidation() {
    let cache = cache();
    store_answer(&cache, "acme", "employee").await;
    store_answer(&cache, "globex", "employee").await;

    assert_eq!(cache.invalidate(Some("*"), None).await.unwrap(), 0);
    assert_eq!(cache.invalidate(Some("acme:employee"), None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_pattern_is_rejected_without_deleting() {
    let store = MemoryCacheStore::new();
    store
        .hset(&cache_key("acme", "employee", "q"), CacheFields::new(), Duration::from_secs(60))
        .await
        .unwrap();

    let err = store.delete_matching("cache:query:[").await.unwrap_err();
    assert!(matches!(err, CacheError::InvalidPattern { .. }));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_store_errors_surface() {
    let cache = SemanticCache::new(BrokenStore, SemanticCacheConfig::default()).unwrap();

    assert!(matches!(
        cache.get("q", &[1.0], "t", "r").await.unwrap_err(),
        CacheError::Store { .. }
    ));
    assert!(cache.set("q", &[1.0], "a", &[], "t", "r", None).await.is_err());
    assert!(cache.invalidate(None, None).await.is_err());
}

#[test]
fn test_entry_fields_roundtrip_keeps_metadata() {
    let entry = CacheEntry {
        tenant: "acme".to_string(),
        role: "employee".to_string(),
        query: "q".to_string(),
        embedding: vec![0.1, 0.2],
        answer: "a".to_string(),
        sources: vec!["x.txt".to_string()],
        timestamp: chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
    };
    let decoded = CacheEntry::from_fields(&entry.to_fields().unwrap()).unwrap();
    assert_eq!(decoded, entry);
}
