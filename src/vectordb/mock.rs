//! In-memory [`DocumentIndex`] for tests.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::client::DocumentIndex;
use super::error::VectorDbError;
use super::filter::PayloadFilter;
use super::model::{DocumentPoint, ScoredDocument, cosine_similarity, parse_point_id};
use super::WriteConsistency;

#[derive(Default)]
pub struct MockDocumentIndex {
    collections: RwLock<BTreeMap<String, MockCollection>>,
    unavailable: AtomicBool,
    search_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    // BTreeMap keeps scroll order deterministic.
    points: BTreeMap<String, DocumentPoint>,
}

impl MockDocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Makes every subsequent call fail as if the server were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `search` calls served so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of `retrieve_by_id` + `scroll_by_filter` calls served so far.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self, collection: &str) -> Result<(), VectorDbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VectorDbError::ConnectionFailed {
                url: format!("mock://{}", collection),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl DocumentIndex for MockDocumentIndex {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.check_available("health")
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.check_available(name)?;
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::CreateCollectionFailed {
                    collection: name.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        collections
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: BTreeMap::new(),
            });

        Ok(())
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        points: Vec<DocumentPoint>,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        self.check_available(collection)?;
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::UpsertFailed {
                    collection: collection.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for point in points {
            if parse_point_id(&point.id).is_none() {
                return Err(VectorDbError::InvalidPointId { id: point.id });
            }
            if point.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }
            coll.points.insert(point.id.clone(), point);
        }

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&PayloadFilter>,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(collection)?;

        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        let mut results: Vec<ScoredDocument> = coll
            .points
            .values()
            .filter(|p| filter.is_none_or(|f| f.matches(&p.payload)))
            .map(|p| ScoredDocument {
                id: p.id.clone(),
                score: cosine_similarity(&query, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(limit as usize);
        Ok(results)
    }

    async fn retrieve_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ScoredDocument>, VectorDbError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(collection)?;

        if parse_point_id(id).is_none() {
            return Ok(None);
        }

        let collections =
            self.collections
                .read()
                .map_err(|_| VectorDbError::RetrieveFailed {
                    collection: collection.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        Ok(coll.points.get(id).map(|p| ScoredDocument {
            id: p.id.clone(),
            score: 0.0,
            payload: p.payload.clone(),
        }))
    }

    async fn scroll_by_filter(
        &self,
        collection: &str,
        filter: &PayloadFilter,
        limit: u32,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(collection)?;

        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::ScrollFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        Ok(coll
            .points
            .values()
            .filter(|p| filter.matches(&p.payload))
            .take(limit as usize)
            .map(|p| ScoredDocument {
                id: p.id.clone(),
                score: 0.0,
                payload: p.payload.clone(),
            })
            .collect())
    }
}
