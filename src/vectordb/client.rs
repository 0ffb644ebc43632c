use std::sync::Arc;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, GetPointsBuilder, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};

use super::error::VectorDbError;
use super::filter::PayloadFilter;
use super::model::{DocumentPayload, DocumentPoint, ScoredDocument, parse_point_id, point_id_to_string};
use crate::vectordb::WriteConsistency;

#[derive(Clone)]
/// Direct Qdrant client wrapper.
pub struct QdrantClient {
    client: Qdrant,
    url: String,
}

impl std::fmt::Debug for QdrantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl QdrantClient {
    /// Creates a client for `url`.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the underlying Qdrant client.
    pub fn client(&self) -> &Qdrant {
        &self.client
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn health_check_inner(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn ensure_collection_inner(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if exists {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine).on_disk(true);
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn upsert_inner(
        &self,
        collection: &str,
        points: Vec<DocumentPoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points = points
            .into_iter()
            .map(|p| {
                let id = parse_point_id(&p.id)
                    .ok_or_else(|| VectorDbError::InvalidPointId { id: p.id.clone() })?;
                Ok(PointStruct::new(id, p.vector, p.payload.into_qdrant()))
            })
            .collect::<Result<Vec<_>, VectorDbError>>()?;

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(collection, qdrant_points).wait(consistency.into()),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search_inner(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&PayloadFilter>,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        if let Some(filter) = filter.and_then(PayloadFilter::to_qdrant) {
            search_builder = search_builder.filter(filter);
        }

        let response = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response
            .result
            .into_iter()
            .map(|point| ScoredDocument {
                id: point_id_to_string(point.id),
                score: point.score,
                payload: DocumentPayload::from_qdrant(point.payload),
            })
            .collect())
    }

    async fn retrieve_by_id_inner(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ScoredDocument>, VectorDbError> {
        let Some(point_id) = parse_point_id(id) else {
            return Ok(None);
        };

        let response = self
            .client
            .get_points(GetPointsBuilder::new(collection, vec![point_id]).with_payload(true))
            .await
            .map_err(|e| VectorDbError::RetrieveFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response.result.into_iter().next().map(|point| ScoredDocument {
            id: point_id_to_string(point.id),
            score: 0.0,
            payload: DocumentPayload::from_qdrant(point.payload),
        }))
    }

    async fn scroll_inner(
        &self,
        collection: &str,
        filter: &PayloadFilter,
        limit: u32,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        let mut builder = ScrollPointsBuilder::new(collection)
            .limit(limit)
            .with_payload(true)
            .with_vectors(false);

        if let Some(filter) = filter.to_qdrant() {
            builder = builder.filter(filter);
        }

        let response =
            self.client
                .scroll(builder)
                .await
                .map_err(|e| VectorDbError::ScrollFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })?;

        Ok(response
            .result
            .into_iter()
            .map(|point| ScoredDocument {
                id: point_id_to_string(point.id),
                score: 0.0,
                payload: DocumentPayload::from_qdrant(point.payload),
            })
            .collect())
    }
}

/// Vector index operations used by retrieval.
pub trait DocumentIndex: Send + Sync {
    /// Checks that the index is reachable.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Ensures a cosine-distance collection exists.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Upserts documents.
    fn upsert_documents(
        &self,
        collection: &str,
        points: Vec<DocumentPoint>,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Nearest-neighbour search restricted by `filter`, ordered by descending similarity.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&PayloadFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredDocument>, VectorDbError>> + Send;

    /// Looks a document up by point id. Non-addressable keys resolve to `None`.
    fn retrieve_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ScoredDocument>, VectorDbError>> + Send;

    /// Returns up to `limit` documents matching `filter`.
    fn scroll_by_filter(
        &self,
        collection: &str,
        filter: &PayloadFilter,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredDocument>, VectorDbError>> + Send;
}

impl DocumentIndex for QdrantClient {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.health_check_inner().await
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.ensure_collection_inner(name, vector_size).await
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        points: Vec<DocumentPoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        self.upsert_inner(collection, points, consistency).await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&PayloadFilter>,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        self.search_inner(collection, query, limit, filter).await
    }

    async fn retrieve_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ScoredDocument>, VectorDbError> {
        self.retrieve_by_id_inner(collection, id).await
    }

    async fn scroll_by_filter(
        &self,
        collection: &str,
        filter: &PayloadFilter,
        limit: u32,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        self.scroll_inner(collection, filter, limit).await
    }
}

impl<T: DocumentIndex> DocumentIndex for Arc<T> {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        (**self).health_check().await
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        (**self).ensure_collection(name, vector_size).await
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        points: Vec<DocumentPoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        (**self)
            .upsert_documents(collection, points, consistency)
            .await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&PayloadFilter>,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        (**self).search(collection, query, limit, filter).await
    }

    async fn retrieve_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ScoredDocument>, VectorDbError> {
        (**self).retrieve_by_id(collection, id).await
    }

    async fn scroll_by_filter(
        &self,
        collection: &str,
        filter: &PayloadFilter,
        limit: u32,
    ) -> Result<Vec<ScoredDocument>, VectorDbError> {
        (**self).scroll_by_filter(collection, filter, limit).await
    }
}
