use super::client::DocumentIndex;
use super::error::VectorDbError;
use super::filter::{PayloadFilter, PrefilterPolicy, build_prefilter};
use super::mock::MockDocumentIndex;
use super::model::{
    DocumentPayload, DocumentPoint, Sensitivity, cosine_similarity, parse_point_id,
};
use super::WriteConsistency;

const TEST_COLLECTION: &str = "test_collection";
const TEST_VECTOR_SIZE: u64 = 8;

fn create_test_vector(seed: u64) -> Vec<f32> {
    (0..TEST_VECTOR_SIZE)
        .map(|i| {
            let mixed = (seed.wrapping_mul(31).wrapping_add(i * 7)) % 1000;
            mixed as f32 / 1000.0 + 0.001
        })
        .collect()
}

fn create_test_point(id: u64, tenant: &str, sensitivity: Sensitivity) -> DocumentPoint {
    DocumentPoint {
        id: id.to_string(),
        vector: create_test_vector(id),
        payload: DocumentPayload::new(
            &format!("chunk {}", id),
            &format!("doc_{}.txt", id),
            tenant,
            sensitivity,
        ),
    }
}

async fn seeded_index() -> MockDocumentIndex {
    let index = MockDocumentIndex::new();
    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    let points = vec![
        create_test_point(1, "acme", Sensitivity::Public),
        create_test_point(2, "acme", Sensitivity::Confidential),
        create_test_point(3, "globex", Sensitivity::Public),
    ];
    index
        .upsert_documents(TEST_COLLECTION, points, WriteConsistency::Strong)
        .await
        .unwrap();
    index
}

#[test]
fn test_parse_point_id_accepts_numeric_and_uuid() {
    assert!(parse_point_id("42").is_some());
    assert!(parse_point_id("6f1c8a52-1d1e-4b4e-9d61-0c6f0e2b9a77").is_some());
}

#[test]
fn test_parse_point_id_rejects_filenames() {
    assert!(parse_point_id("sample.txt").is_none());
    assert!(parse_point_id("").is_none());
    assert!(parse_point_id("-1").is_none());
}

#[test]
fn test_cosine_similarity_degenerate_vectors() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
}

#[test]
fn test_payload_field_and_attributes() {
    let mut payload = DocumentPayload::new("t", "a.txt", "acme", Sensitivity::Confidential);
    payload
        .extra
        .insert("doc_type".to_string(), "contract".to_string());

    assert_eq!(payload.field("tenant").as_deref(), Some("acme"));
    assert_eq!(payload.field("sensitivity").as_deref(), Some("confidential"));
    assert_eq!(payload.field("doc_type").as_deref(), Some("contract"));
    assert_eq!(payload.field("missing"), None);

    let attrs = payload.attributes();
    assert_eq!(attrs.get("source").map(String::as_str), Some("a.txt"));
    assert!(!attrs.contains_key("text"));
}

#[test]
fn test_payload_missing_sensitivity_never_matches_public() {
    let payload = DocumentPayload {
        text: "t".to_string(),
        tenant: "acme".to_string(),
        ..Default::default()
    };
    let filter = PayloadFilter::new().must("sensitivity", "public");
    assert!(!filter.matches(&payload));
}

#[test]
fn test_payload_qdrant_conversion_keeps_fields() {
    let mut payload = DocumentPayload::new("body", "a.txt", "acme", Sensitivity::Public);
    payload.extra.insert("year".to_string(), "2023".to_string());

    let back = DocumentPayload::from_qdrant(payload.clone().into_qdrant());
    assert_eq!(back, payload);
}

#[test]
fn test_sensitivity_parse() {
    assert_eq!(Sensitivity::parse("Public"), Some(Sensitivity::Public));
    assert_eq!(
        Sensitivity::parse(" confidential "),
        Some(Sensitivity::Confidential)
    );
    assert_eq!(Sensitivity::parse("secret"), None);
}

#[test]
fn test_prefilter_restricts_employee_to_public() {
    let policy = PrefilterPolicy::default();
    let filter = build_prefilter("acme", "employee", &policy);

    let public = DocumentPayload::new("t", "a", "acme", Sensitivity::Public);
    let confidential = DocumentPayload::new("t", "b", "acme", Sensitivity::Confidential);
    let other_tenant = DocumentPayload::new("t", "c", "globex", Sensitivity::Public);

    assert!(filter.matches(&public));
    assert!(!filter.matches(&confidential));
    assert!(!filter.matches(&other_tenant));
}

#[test]
fn test_prefilter_manager_sees_confidential_within_tenant() {
    let policy = PrefilterPolicy::default();
    let filter = build_prefilter("acme", "Manager", &policy);

    let confidential = DocumentPayload::new("t", "b", "acme", Sensitivity::Confidential);
    let other_tenant = DocumentPayload::new("t", "c", "globex", Sensitivity::Confidential);

    assert!(filter.matches(&confidential));
    assert!(!filter.matches(&other_tenant));
}

#[test]
fn test_prefilter_unknown_role_is_restricted() {
    let policy = PrefilterPolicy::with_confidential_roles(["manager", "legal"]);
    assert!(policy.allows_confidential("LEGAL"));
    assert!(!policy.allows_confidential("intern"));

    let filter = build_prefilter("acme", "intern", &policy);
    assert_eq!(filter.conditions().len(), 2);
}

#[test]
fn test_prefilter_normalizes_tenant_like_cache_key() {
    let policy = PrefilterPolicy::default();
    let upper = build_prefilter(" ACME ", "employee", &policy);
    assert_eq!(upper, build_prefilter("acme", "employee", &policy));

    let public = DocumentPayload::new("t", "a", "acme", Sensitivity::Public);
    assert!(upper.matches(&public));
}

#[test]
fn test_filter_to_qdrant() {
    assert!(PayloadFilter::new().to_qdrant().is_none());
    let filter = PayloadFilter::new().must("tenant", "acme").must("source", "a.txt");
    let qdrant = filter.to_qdrant().expect("non-empty filter");
    assert_eq!(qdrant.must.len(), 2);
}

#[test]
fn test_filter_and_combines_conditions() {
    let a = PayloadFilter::new().must("tenant", "acme");
    let b = PayloadFilter::new().must("source", "a.txt");
    let both = a.and(&b);
    assert_eq!(both.conditions().len(), 2);

    let hit = DocumentPayload::new("t", "a.txt", "acme", Sensitivity::Public);
    let miss = DocumentPayload::new("t", "b.txt", "acme", Sensitivity::Public);
    assert!(both.matches(&hit));
    assert!(!both.matches(&miss));
}

#[tokio::test]
async fn test_search_applies_filter() {
    let index = seeded_index().await;
    let filter = build_prefilter("acme", "employee", &PrefilterPolicy::default());

    let results = index
        .search(TEST_COLLECTION, create_test_vector(2), 10, Some(&filter))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1");
    assert_eq!(index.search_calls(), 1);
}

#[tokio::test]
async fn test_search_orders_by_similarity() {
    let index = seeded_index().await;

    let results = index
        .search(TEST_COLLECTION, create_test_vector(3), 3, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "3");
    assert!(results[0].score >= results[1].score);
    assert!(results[1].score >= results[2].score);
}

#[tokio::test]
async fn test_search_respects_limit() {
    let index = seeded_index().await;
    let results = index
        .search(TEST_COLLECTION, create_test_vector(1), 2, None)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_retrieve_by_id() {
    let index = seeded_index().await;

    let found = index.retrieve_by_id(TEST_COLLECTION, "2").await.unwrap();
    assert_eq!(found.map(|d| d.payload.source), Some("doc_2.txt".to_string()));

    let missing = index.retrieve_by_id(TEST_COLLECTION, "99").await.unwrap();
    assert!(missing.is_none());

    let filename = index
        .retrieve_by_id(TEST_COLLECTION, "doc_1.txt")
        .await
        .unwrap();
    assert!(filename.is_none());
}

#[tokio::test]
async fn test_scroll_by_source() {
    let index = seeded_index().await;
    let filter = PayloadFilter::new().must("source", "doc_3.txt");

    let docs = index
        .scroll_by_filter(TEST_COLLECTION, &filter, 1)
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "3");
}

#[tokio::test]
async fn test_upsert_rejects_dimension_mismatch() {
    let index = seeded_index().await;
    let point = DocumentPoint {
        id: "10".to_string(),
        vector: vec![1.0; 3],
        payload: DocumentPayload::default(),
    };

    let err = index
        .upsert_documents(TEST_COLLECTION, vec![point], WriteConsistency::Strong)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VectorDbError::InvalidDimension {
            expected: 8,
            actual: 3
        }
    ));
}

#[tokio::test]
async fn test_upsert_rejects_filename_ids() {
    let index = seeded_index().await;
    let point = DocumentPoint::new(create_test_vector(9), DocumentPayload::default())
        .with_id("contract.txt");

    let err = index
        .upsert_documents(TEST_COLLECTION, vec![point], WriteConsistency::Eventual)
        .await
        .unwrap_err();
    assert!(matches!(err, VectorDbError::InvalidPointId { .. }));
}

#[tokio::test]
async fn test_generated_point_ids_are_uuids() {
    let index = seeded_index().await;
    let point = DocumentPoint::new(create_test_vector(7), DocumentPayload::default());
    assert!(parse_point_id(&point.id).is_some());

    index
        .upsert_documents(TEST_COLLECTION, vec![point], WriteConsistency::Strong)
        .await
        .unwrap();
    assert_eq!(index.point_count(TEST_COLLECTION), Some(4));
}

#[tokio::test]
async fn test_unavailable_index_fails_search() {
    let index = seeded_index().await;
    index.set_unavailable(true);

    let err = index
        .search(TEST_COLLECTION, create_test_vector(1), 3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, VectorDbError::ConnectionFailed { .. }));
    assert!(index.health_check().await.is_err());
}

#[tokio::test]
async fn test_missing_collection() {
    let index = MockDocumentIndex::new();
    let err = index
        .search("nope", create_test_vector(1), 3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, VectorDbError::CollectionNotFound { .. }));
}
