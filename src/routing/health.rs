use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::constants::HEALTH_CHECK_TIMEOUT;
use crate::embedding::EmbeddingProvider;
use crate::vectordb::VectorIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reachability of each dependency.
pub struct HealthStatus {
    pub embedding: bool,
    pub index: bool,
}

impl HealthStatus {
    /// Both dependencies responded.
    pub fn is_healthy(&self) -> bool {
        self.embedding && self.index
    }
}

/// Checks both dependencies concurrently, each under its own timeout.
pub struct HealthProbe<E: EmbeddingProvider, V: VectorIndex> {
    embedder: Arc<E>,
    index: Arc<V>,
    timeout: Duration,
}

impl<E: EmbeddingProvider, V: VectorIndex> Clone for HealthProbe<E, V> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            index: Arc::clone(&self.index),
            timeout: self.timeout,
        }
    }
}

impl<E: EmbeddingProvider, V: VectorIndex> HealthProbe<E, V> {
    pub fn new(embedder: Arc<E>, index: Arc<V>) -> Self {
        Self {
            embedder,
            index,
            timeout: HEALTH_CHECK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Never fails; an error or timeout reports the dependency as unhealthy.
    pub async fn check(&self) -> HealthStatus {
        let (embedding, index) = tokio::join!(self.check_embedding(), self.check_index());
        HealthStatus { embedding, index }
    }

    async fn check_embedding(&self) -> bool {
        match timeout(self.timeout, self.embedder.health_check()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Embedding service health check failed");
                false
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Embedding service health check timed out");
                false
            }
        }
    }

    async fn check_index(&self) -> bool {
        match timeout(self.timeout, self.index.health_check()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Qdrant health check failed");
                false
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Qdrant health check timed out");
                false
            }
        }
    }
}
