use std::collections::HashMap;
use std::time::Duration;

use crate::constants::DEFAULT_ROUTE_NAME;

use super::selector::GateOutcome;

/// A routing request.
///
/// `top_k` and `score_threshold` override the process defaults; a zero value means
/// "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteQuery {
    pub query: String,
    pub top_k: u64,
    pub score_threshold: f32,
    /// Payload equality conditions, all of which must hold.
    pub filters: HashMap<String, String>,
}

impl RouteQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_top_k(mut self, top_k: u64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }
}

/// The route picked for a query, or the synthetic default route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub name: String,
    pub model: String,
    /// Aggregate score of the route; always `0.0` for the default route.
    pub confidence: f32,
    pub metadata: HashMap<String, String>,
}

impl RouteCandidate {
    /// The fallback used when no match clears the confidence gate.
    pub fn default_route(default_model: &str) -> Self {
        Self {
            name: DEFAULT_ROUTE_NAME.to_string(),
            model: default_model.to_string(),
            confidence: 0.0,
            metadata: HashMap::new(),
        }
    }
}

/// Result of a routing request, with per-stage latency.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    pub route: String,
    pub model: String,
    pub confidence: f32,
    pub metadata: HashMap<String, String>,
    /// Pipeline entry to decision.
    pub total_latency: Duration,
    pub embedding_latency: Duration,
    pub search_latency: Duration,
    /// How the confidence gate resolved.
    pub outcome: GateOutcome,
}

impl RouteDecision {
    pub(crate) fn new(
        candidate: RouteCandidate,
        outcome: GateOutcome,
        embedding_latency: Duration,
        search_latency: Duration,
        total_latency: Duration,
    ) -> Self {
        Self {
            route: candidate.name,
            model: candidate.model,
            confidence: candidate.confidence,
            metadata: candidate.metadata,
            total_latency,
            embedding_latency,
            search_latency,
            outcome,
        }
    }

    /// `true` when the default route was returned by the gate.
    pub fn is_fallback(&self) -> bool {
        !self.outcome.is_passed()
    }

    pub fn total_latency_ms(&self) -> f64 {
        duration_ms(self.total_latency)
    }

    pub fn embedding_ms(&self) -> f64 {
        duration_ms(self.embedding_latency)
    }

    pub fn vector_search_ms(&self) -> f64 {
        duration_ms(self.search_latency)
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
