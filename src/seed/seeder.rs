use std::path::Path;
use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::{
    PAYLOAD_MODEL_KEY, PAYLOAD_PROVIDER_KEY, PAYLOAD_ROUTE_KEY, PAYLOAD_UTTERANCE_KEY,
};
use crate::embedding::EmbeddingProvider;
use crate::vectordb::{RoutePoint, VectorStore};

use super::error::SeedError;
use super::types::{RouteDefinition, RoutesFile};

/// Embedded once to learn the collection's vector size.
pub const DIMENSION_PROBE_TEXT: &str = "test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub routes: usize,
    pub points: usize,
    pub dimension: usize,
    /// Point count read back from the store, when it reports one.
    pub stored_points: Option<u64>,
}

/// Rebuilds the route collection from route definitions.
pub struct RouteSeeder<E: EmbeddingProvider, S: VectorStore> {
    embedder: Arc<E>,
    store: Arc<S>,
    collection: String,
}

impl<E: EmbeddingProvider, S: VectorStore> RouteSeeder<E, S> {
    pub fn new(embedder: Arc<E>, store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn seed_file(&self, path: impl AsRef<Path>) -> Result<SeedReport, SeedError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading routes");
        let file = RoutesFile::load(path)?;
        self.seed(&file).await
    }

    /// Embeds every utterance, then drops and recreates the collection and writes one
    /// point per utterance.
    ///
    /// Definitions are validated and all embeddings computed before the store is touched,
    /// so a failed run leaves the existing collection in place.
    pub async fn seed(&self, file: &RoutesFile) -> Result<SeedReport, SeedError> {
        file.validate()?;

        let probe = self.embedder.embed(DIMENSION_PROBE_TEXT).await?;
        let dimension = probe.len();
        info!(dimension, "Embedding dimension detected");

        let mut points = Vec::new();
        for route in &file.routes {
            if route.utterances.is_empty() {
                warn!(route = %route.name, "Route has no utterances");
                continue;
            }
            info!(
                route = %route.name,
                utterances = route.utterances.len(),
                "Processing route"
            );
            points.extend(self.route_points(route).await?);
        }

        info!(collection = %self.collection, "Recreating collection");
        self.store
            .recreate_collection(&self.collection, dimension as u64)
            .await?;

        let total = points.len();
        info!(points = total, "Upserting points");
        self.store.upsert_points(&self.collection, points).await?;

        let stored_points = match self.store.point_count(&self.collection).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Could not read back point count");
                None
            }
        };

        info!(
            collection = %self.collection,
            stored_points = ?stored_points,
            points = total,
            routes = file.routes.len(),
            "Seeding complete"
        );

        Ok(SeedReport {
            routes: file.routes.len(),
            points: total,
            dimension,
            stored_points,
        })
    }

    async fn route_points(&self, route: &RouteDefinition) -> Result<Vec<RoutePoint>, SeedError> {
        let vectors = try_join_all(route.utterances.iter().map(|u| self.embedder.embed(u))).await?;

        Ok(route
            .utterances
            .iter()
            .zip(vectors)
            .map(|(utterance, vector)| {
                let mut point = RoutePoint::new(Uuid::new_v4().to_string(), vector);
                point.payload = route.metadata.clone();
                point
                    .with_payload(PAYLOAD_ROUTE_KEY, route.name.as_str())
                    .with_payload(PAYLOAD_MODEL_KEY, route.model.as_str())
                    .with_payload(PAYLOAD_PROVIDER_KEY, route.provider())
                    .with_payload(PAYLOAD_UTTERANCE_KEY, utterance.as_str())
            })
            .collect())
    }
}
