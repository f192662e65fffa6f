use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::routing::{HealthStatus, RouteDecision, RouteQuery};

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_UNHEALTHY: &str = "unhealthy";

/// Body of `POST /v1/route`. Omitted numeric fields mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: u64,
    #[serde(default)]
    pub score_threshold: f32,
    #[serde(default)]
    pub filters: HashMap<String, String>,
    /// Caller deadline in milliseconds; `0` means none.
    #[serde(default)]
    pub timeout_ms: u64,
}

impl RouteRequest {
    pub fn to_query(&self) -> RouteQuery {
        RouteQuery {
            query: self.query.clone(),
            top_k: self.top_k,
            score_threshold: self.score_threshold,
            filters: self.filters.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyBreakdown {
    pub embedding_ms: f64,
    pub vector_search_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route: String,
    pub model: String,
    pub confidence: f32,
    pub total_latency_ms: f64,
    pub latency_breakdown: LatencyBreakdown,
    pub metadata: HashMap<String, String>,
}

impl From<RouteDecision> for RouteResponse {
    fn from(decision: RouteDecision) -> Self {
        Self {
            total_latency_ms: decision.total_latency_ms(),
            latency_breakdown: LatencyBreakdown {
                embedding_ms: decision.embedding_ms(),
                vector_search_ms: decision.vector_search_ms(),
            },
            route: decision.route,
            model: decision.model,
            confidence: decision.confidence,
            metadata: decision.metadata,
        }
    }
}

/// Body of `GET /v1/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcHealthResponse {
    pub healthy: bool,
    pub embedding_service_status: String,
    pub qdrant_status: String,
}

impl From<HealthStatus> for RpcHealthResponse {
    fn from(status: HealthStatus) -> Self {
        let label = |ok: bool| if ok { STATUS_HEALTHY } else { STATUS_UNHEALTHY }.to_string();
        Self {
            healthy: status.is_healthy(),
            embedding_service_status: label(status.embedding),
            qdrant_status: label(status.index),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub embedding: bool,
    pub qdrant: bool,
}

impl From<HealthStatus> for HealthResponse {
    fn from(status: HealthStatus) -> Self {
        Self {
            healthy: status.is_healthy(),
            embedding: status.embedding,
            qdrant: status.index,
        }
    }
}
