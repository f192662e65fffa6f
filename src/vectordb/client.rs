use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use std::collections::HashMap;

use super::error::VectorDbError;
use super::filter::EqualityFilter;
use super::model::{RoutePoint, ScoredMatch};

#[derive(Clone)]
/// Qdrant client wrapper.
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
    ///
    /// Connections are established lazily; use [`QdrantClient::health_check`] to verify
    /// reachability at startup.
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

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Drops `name` if present, then creates it with cosine distance.
    pub async fn recreate_collection(
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
            self.client.delete_collection(name).await.map_err(|e| {
                VectorDbError::DeleteCollectionFailed {
                    collection: name.to_string(),
                    message: e.to_string(),
                }
            })?;
        }

        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Upserts points into a collection and waits for them to be indexed.
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<RoutePoint>,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload: HashMap<String, qdrant_client::qdrant::Value> = p
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect();

                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Searches a collection by vector similarity, returning payloads.
    pub async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&EqualityFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        if let Some(filter) = filter {
            search_builder = search_builder.filter(filter.to_qdrant());
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(search_result
            .result
            .into_iter()
            .map(ScoredMatch::from_scored_point)
            .collect())
    }

    /// Number of points in `collection`, if Qdrant reports it.
    pub async fn point_count(&self, collection: &str) -> Result<Option<u64>, VectorDbError> {
        let info = self.client.collection_info(collection).await.map_err(|e| {
            VectorDbError::CollectionInfoFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(info.result.and_then(|r| r.points_count))
    }
}

/// Nearest-neighbor search capability used by the routing pipeline.
pub trait VectorIndex: Send + Sync {
    /// Returns at most `limit` matches ordered by descending score.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&EqualityFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredMatch>, VectorDbError>> + Send;

    /// Performs a lightweight round-trip to the index.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

/// Write access needed to seed the route collection.
pub trait VectorStore: VectorIndex {
    /// Drops (if present) and recreates `name` for vectors of `vector_size`.
    fn recreate_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Upserts points.
    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<RoutePoint>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Point count, when the store can report it.
    fn point_count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Option<u64>, VectorDbError>> + Send;
}

impl VectorIndex for QdrantClient {
    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&EqualityFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorDbError> {
        self.search(collection, query, limit, filter).await
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.health_check().await
    }
}

impl VectorStore for QdrantClient {
    async fn recreate_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.recreate_collection(name, vector_size).await
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<RoutePoint>,
    ) -> Result<(), VectorDbError> {
        self.upsert_points(collection, points).await
    }

    async fn point_count(&self, collection: &str) -> Result<Option<u64>, VectorDbError> {
        self.point_count(collection).await
    }
}
