use std::collections::HashMap;

use tracing::warn;

use crate::constants::is_reserved_payload_key;
use crate::vectordb::ScoredMatch;

#[derive(Debug, Clone, PartialEq)]
/// Accumulated evidence for one route label.
pub struct RouteAggregate {
    /// Route label (`""` for matches without one).
    pub route: String,
    /// Model from the route's first match.
    pub model: String,
    /// Sum of the scores of every match carrying this label.
    pub score: f32,
    /// Number of matches aggregated.
    pub matches: usize,
    /// Non-reserved payload fields of the route's first match.
    pub metadata: HashMap<String, String>,
}

impl RouteAggregate {
    fn from_first_match(route: String, m: &ScoredMatch) -> Self {
        let metadata = m
            .payload
            .iter()
            .filter(|(k, _)| !is_reserved_payload_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            route,
            model: m.model().unwrap_or_default().to_string(),
            score: 0.0,
            matches: 0,
            metadata,
        }
    }
}

/// Groups matches by route label, preserving the order labels were first seen.
///
/// Selection iterates that order, so ties resolve to the route encountered first in the
/// search results and never depend on hash iteration order.
#[derive(Debug, Default)]
pub struct RouteAggregator {
    routes: Vec<RouteAggregate>,
    positions: HashMap<String, usize>,
}

impl RouteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates `matches` in the order given.
    pub fn from_matches(matches: &[ScoredMatch]) -> Self {
        let mut aggregator = Self::new();
        for m in matches {
            aggregator.add(m);
        }
        aggregator
    }

    /// Adds one match. Model and metadata are taken only from a route's first match.
    pub fn add(&mut self, m: &ScoredMatch) {
        let route = match m.route() {
            Some(route) => route.to_string(),
            None => {
                warn!(match_id = %m.id, "Match has no route label, aggregating under empty label");
                String::new()
            }
        };

        let position = match self.positions.get(&route) {
            Some(&position) => position,
            None => {
                let position = self.routes.len();
                self.routes
                    .push(RouteAggregate::from_first_match(route.clone(), m));
                self.positions.insert(route, position);
                position
            }
        };

        let aggregate = &mut self.routes[position];
        aggregate.score += m.score;
        aggregate.matches += 1;
    }

    /// Aggregates in first-seen order.
    pub fn routes(&self) -> &[RouteAggregate] {
        &self.routes
    }

    pub fn get(&self, route: &str) -> Option<&RouteAggregate> {
        self.positions.get(route).map(|&i| &self.routes[i])
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route with the greatest summed score.
    ///
    /// The first aggregate starts as best and is only replaced by a strictly greater sum.
    pub fn best(&self) -> Option<&RouteAggregate> {
        let mut iter = self.routes.iter();
        let mut best = iter.next()?;
        for candidate in iter {
            if candidate.score > best.score {
                best = candidate;
            }
        }
        Some(best)
    }

    pub fn into_best(self) -> Option<RouteAggregate> {
        let mut iter = self.routes.into_iter();
        let mut best = iter.next()?;
        for candidate in iter {
            if candidate.score > best.score {
                best = candidate;
            }
        }
        Some(best)
    }
}
