use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::routing::{HealthProbe, RoutingPipeline};
use crate::vectordb::VectorIndex;

/// Shared by both routers.
pub struct RouterState<E: EmbeddingProvider + 'static, V: VectorIndex + 'static> {
    pub pipeline: Arc<RoutingPipeline<E, V>>,

    pub health: HealthProbe<E, V>,
}

impl<E, V> Clone for RouterState<E, V>
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            health: self.health.clone(),
        }
    }
}

impl<E, V> RouterState<E, V>
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    pub fn new(pipeline: RoutingPipeline<E, V>) -> Self {
        let health = pipeline.health_probe();
        Self {
            pipeline: Arc::new(pipeline),
            health,
        }
    }
}
