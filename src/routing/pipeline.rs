use std::sync::Arc;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

use crate::embedding::EmbeddingProvider;
use crate::vectordb::{EqualityFilter, ScoredMatch, VectorIndex};

use super::config::RoutingConfig;
use super::error::{RoutingError, RoutingResult};
use super::health::HealthProbe;
use super::selector::RouteSelector;
use super::types::{RouteDecision, RouteQuery};

/// Embed, search, aggregate, select.
///
/// Stages run strictly in sequence and nothing is retried. An infrastructure failure
/// surfaces as a [`RoutingError`]; the default route is only ever returned by the
/// confidence gate.
pub struct RoutingPipeline<E: EmbeddingProvider, V: VectorIndex> {
    embedder: Arc<E>,
    index: Arc<V>,
    selector: RouteSelector,
    config: RoutingConfig,
}

impl<E: EmbeddingProvider, V: VectorIndex> std::fmt::Debug for RoutingPipeline<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider, V: VectorIndex> RoutingPipeline<E, V> {
    pub fn new(embedder: Arc<E>, index: Arc<V>, config: RoutingConfig) -> Self {
        let selector = RouteSelector::new(config.default_model.clone());
        Self {
            embedder,
            index,
            selector,
            config,
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn index(&self) -> &Arc<V> {
        &self.index
    }

    /// Probe over the same dependencies this pipeline uses.
    pub fn health_probe(&self) -> HealthProbe<E, V> {
        HealthProbe::new(Arc::clone(&self.embedder), Arc::clone(&self.index))
    }

    /// Routes `query`, bounding only the embedding stage (by the configured timeout).
    #[instrument(skip(self, query), fields(query_len = query.query.len(), filters = query.filters.len()))]
    pub async fn route(&self, query: &RouteQuery) -> RoutingResult<RouteDecision> {
        self.run(query, None).await
    }

    /// Routes `query`, abandoning whichever stage is in flight when `deadline` passes.
    ///
    /// Expiry maps to the error kind of the stage that was running. Dropping the returned
    /// future cancels the outstanding call as well.
    #[instrument(skip(self, query, deadline), fields(query_len = query.query.len(), filters = query.filters.len()))]
    pub async fn route_with_deadline(
        &self,
        query: &RouteQuery,
        deadline: Instant,
    ) -> RoutingResult<RouteDecision> {
        self.run(query, Some(deadline)).await
    }

    async fn run(
        &self,
        query: &RouteQuery,
        deadline: Option<Instant>,
    ) -> RoutingResult<RouteDecision> {
        let start = Instant::now();
        let top_k = self.config.effective_top_k(query.top_k);
        let threshold = self.config.effective_threshold(query.score_threshold);

        debug!(top_k, threshold, "Embedding query");
        let embed_start = Instant::now();
        let vector = self.embed(&query.query, embed_start, deadline).await?;
        let embedding_latency = embed_start.elapsed();

        let filter = EqualityFilter::from_map(&query.filters);

        debug!(
            dimension = vector.len(),
            filtered = filter.is_some(),
            "Searching route index"
        );
        let search_start = Instant::now();
        let matches = self.search(vector, top_k, filter.as_ref(), deadline).await?;
        let search_latency = search_start.elapsed();

        let selection = self.selector.select(&matches, threshold);
        let decision = RouteDecision::new(
            selection.candidate,
            selection.outcome,
            embedding_latency,
            search_latency,
            start.elapsed(),
        );

        info!(
            route = %decision.route,
            model = %decision.model,
            confidence = decision.confidence,
            matches = matches.len(),
            gate = decision.outcome.debug_status(),
            total_ms = decision.total_latency_ms(),
            "Query routed"
        );

        Ok(decision)
    }

    async fn embed(
        &self,
        text: &str,
        started: Instant,
        deadline: Option<Instant>,
    ) -> RoutingResult<Vec<f32>> {
        let stage_deadline = started + self.config.embedding_timeout;
        let (bound, reason) = match deadline {
            Some(request_deadline) if request_deadline < stage_deadline => {
                (request_deadline, "request deadline exceeded".to_string())
            }
            _ => (
                stage_deadline,
                format!(
                    "timed out after {}ms",
                    self.config.embedding_timeout.as_millis()
                ),
            ),
        };

        match timeout_at(bound, self.embedder.embed(text)).await {
            Ok(Ok(vector)) => Ok(vector),
            Ok(Err(e)) => {
                warn!(error = %e, "Embedding failed");
                Err(RoutingError::EmbeddingFailed {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(%reason, "Embedding abandoned");
                Err(RoutingError::EmbeddingFailed { reason })
            }
        }
    }

    async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&EqualityFilter>,
        deadline: Option<Instant>,
    ) -> RoutingResult<Vec<ScoredMatch>> {
        let search = self
            .index
            .search(&self.config.collection_name, vector, top_k, filter);

        let result = match deadline {
            Some(deadline) => match timeout_at(deadline, search).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Vector search abandoned at request deadline");
                    return Err(RoutingError::SearchFailed {
                        reason: "request deadline exceeded".to_string(),
                    });
                }
            },
            None => search.await,
        };

        result.map_err(|e| {
            warn!(error = %e, "Vector search failed");
            RoutingError::SearchFailed {
                reason: e.to_string(),
            }
        })
    }
}
