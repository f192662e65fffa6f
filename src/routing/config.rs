use std::time::Duration;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_MODEL, DEFAULT_SCORE_THRESHOLD,
    DEFAULT_TOP_K,
};

/// Process-wide routing defaults, fixed at startup.
///
/// Builder setters ignore zero values (`""`, `0`, `0.0`, zero duration), keeping the
/// current setting instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Collection holding the route utterances.
    pub collection_name: String,
    /// Model reported for the `default` route.
    pub default_model: String,
    /// Default confidence threshold.
    pub score_threshold: f32,
    /// Default number of matches requested.
    pub top_k: u64,
    /// Per-call budget for the embedding stage.
    pub embedding_timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
        }
    }
}

impl RoutingConfig {
    pub fn collection_name(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.collection_name = name.to_string();
        }
        self
    }

    pub fn default_model(mut self, model: &str) -> Self {
        if !model.is_empty() {
            self.default_model = model.to_string();
        }
        self
    }

    pub fn score_threshold(mut self, threshold: f32) -> Self {
        if threshold != 0.0 {
            self.score_threshold = threshold;
        }
        self
    }

    pub fn top_k(mut self, top_k: u64) -> Self {
        if top_k != 0 {
            self.top_k = top_k;
        }
        self
    }

    pub fn embedding_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.embedding_timeout = timeout;
        }
        self
    }

    /// `requested` if non-zero, else the configured default.
    pub fn effective_top_k(&self, requested: u64) -> u64 {
        if requested == 0 {
            self.top_k
        } else {
            requested
        }
    }

    /// `requested` if non-zero, else the configured default.
    pub fn effective_threshold(&self, requested: f32) -> f32 {
        if requested == 0.0 {
            self.score_threshold
        } else {
            requested
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.score_threshold.is_finite() {
            return Err(format!(
                "score_threshold must be finite, got {}",
                self.score_threshold
            ));
        }

        if self.collection_name.is_empty() {
            return Err("collection_name cannot be empty".to_string());
        }

        Ok(())
    }
}
