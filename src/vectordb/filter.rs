use std::collections::{BTreeMap, HashMap};

use qdrant_client::qdrant::{Condition, Filter};

/// Conjunctive equality filter on payload fields.
///
/// Every condition must hold (`field == value`). Conditions are kept sorted by field so
/// the filter sent to the index is identical for identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EqualityFilter {
    conditions: BTreeMap<String, String>,
}

impl EqualityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from request filters. An empty map means "no filter".
    pub fn from_map(filters: &HashMap<String, String>) -> Option<Self> {
        if filters.is_empty() {
            return None;
        }

        Some(Self {
            conditions: filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn with_condition(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns `true` if `payload` satisfies every condition.
    pub fn matches(&self, payload: &HashMap<String, String>) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| payload.get(field) == Some(value))
    }

    /// Converts to a Qdrant `must` filter of keyword matches.
    pub fn to_qdrant(&self) -> Filter {
        Filter::must(
            self.conditions
                .iter()
                .map(|(field, value)| Condition::matches(field.clone(), value.clone())),
        )
    }
}
