use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{PAYLOAD_PROVIDER_KEY, is_reserved_payload_key};

use super::error::SeedError;

/// Provider recorded when a route does not name one.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Top-level shape of a routes file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

impl RoutesFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects an empty route list and any invalid definition.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.routes.is_empty() {
            return Err(SeedError::NoRoutes);
        }
        self.routes.iter().try_for_each(RouteDefinition::validate)
    }
}

/// One route and the utterances that should select it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Extra payload fields, surfaced as decision metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub utterances: Vec<String>,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            provider: None,
            metadata: HashMap::new(),
            utterances: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.utterances.push(utterance.into());
        self
    }

    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or(UNKNOWN_PROVIDER)
    }

    /// Name and model must be non-empty; metadata may not shadow the fields the router
    /// reads back (`route`, `model`, `utterance`, `provider`).
    pub fn validate(&self) -> Result<(), SeedError> {
        let invalid = |reason: String| SeedError::InvalidRoute {
            route: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name cannot be empty".to_string()));
        }
        if self.model.is_empty() {
            return Err(invalid("model cannot be empty".to_string()));
        }

        if let Some(key) = self
            .metadata
            .keys()
            .find(|k| is_reserved_payload_key(k) || k.as_str() == PAYLOAD_PROVIDER_KEY)
        {
            return Err(invalid(format!("metadata key '{key}' is reserved")));
        }

        Ok(())
    }
}
