use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{PointId, ScoredPoint, Value};

use crate::constants::{PAYLOAD_MODEL_KEY, PAYLOAD_ROUTE_KEY};

/// One nearest-neighbor result: opaque id, similarity score and flattened payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub id: String,
    /// Higher is more similar.
    pub score: f32,
    pub payload: HashMap<String, String>,
}

impl ScoredMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            payload: HashMap::new(),
        }
    }

    /// Shorthand for a match carrying `route` and `model` payload fields.
    pub fn for_route(
        id: impl Into<String>,
        score: f32,
        route: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(id, score)
            .with_payload(PAYLOAD_ROUTE_KEY, route)
            .with_payload(PAYLOAD_MODEL_KEY, model)
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Route label, if the payload carries one.
    pub fn route(&self) -> Option<&str> {
        self.payload.get(PAYLOAD_ROUTE_KEY).map(String::as_str)
    }

    pub fn model(&self) -> Option<&str> {
        self.payload.get(PAYLOAD_MODEL_KEY).map(String::as_str)
    }

    pub fn from_scored_point(point: ScoredPoint) -> Self {
        let payload = point
            .payload
            .iter()
            .map(|(k, v)| (k.clone(), payload_value_to_string(v)))
            .collect();

        Self {
            id: point_id_to_string(point.id),
            score: point.score,
            payload,
        }
    }
}

/// A point to write into the route collection.
#[derive(Debug, Clone)]
pub struct RoutePoint {
    /// UUID string.
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, String>,
}

impl RoutePoint {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            payload: HashMap::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// Renders a scalar payload value as a string.
///
/// Strings pass through; numbers and booleans use their display form. Nulls, lists and
/// structs become the empty string.
pub fn payload_value_to_string(value: &Value) -> String {
    match &value.kind {
        Some(Kind::StringValue(s)) => s.clone(),
        Some(Kind::IntegerValue(i)) => i.to_string(),
        Some(Kind::DoubleValue(d)) => d.to_string(),
        Some(Kind::BoolValue(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn point_id_to_string(id: Option<PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(s)) => s,
        None => String::new(),
    }
}
