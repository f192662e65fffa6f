use tracing::debug;

use crate::vectordb::ScoredMatch;

use super::aggregator::RouteAggregator;
use super::types::RouteCandidate;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Outcome of the confidence gate.
pub enum GateOutcome {
    /// Top match reached the threshold.
    Passed {
        /// Score of the top match.
        top_score: f32,
    },
    /// Top match fell short of the threshold.
    BelowThreshold {
        /// Score of the top match.
        top_score: f32,
    },
    /// The search returned nothing.
    NoMatches,
}

impl GateOutcome {
    /// Gates on the first match only; `matches` must be ordered by descending score.
    ///
    /// A NaN top score never passes.
    pub fn evaluate(matches: &[ScoredMatch], threshold: f32) -> Self {
        match matches.first() {
            None => GateOutcome::NoMatches,
            Some(top) if top.score >= threshold => GateOutcome::Passed {
                top_score: top.score,
            },
            Some(top) => GateOutcome::BelowThreshold {
                top_score: top.score,
            },
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, GateOutcome::Passed { .. })
    }

    pub fn top_score(&self) -> Option<f32> {
        match self {
            GateOutcome::Passed { top_score } | GateOutcome::BelowThreshold { top_score } => {
                Some(*top_score)
            }
            GateOutcome::NoMatches => None,
        }
    }

    pub fn debug_status(&self) -> &'static str {
        match self {
            GateOutcome::Passed { .. } => "PASSED",
            GateOutcome::BelowThreshold { .. } => "BELOW_THRESHOLD",
            GateOutcome::NoMatches => "NO_MATCHES",
        }
    }
}

impl std::fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateOutcome::Passed { top_score } => write!(f, "PASSED (top_score: {:.4})", top_score),
            GateOutcome::BelowThreshold { top_score } => {
                write!(f, "BELOW_THRESHOLD (top_score: {:.4})", top_score)
            }
            GateOutcome::NoMatches => write!(f, "NO_MATCHES"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Selected candidate together with how the gate resolved.
pub struct RouteSelection {
    pub candidate: RouteCandidate,
    pub outcome: GateOutcome,
}

#[derive(Debug, Clone)]
/// Turns an ordered match list into a single route.
pub struct RouteSelector {
    default_model: String,
}

impl RouteSelector {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn default_candidate(&self) -> RouteCandidate {
        RouteCandidate::default_route(&self.default_model)
    }

    /// Gates on the top match, then picks the route with the greatest summed score.
    pub fn select(&self, matches: &[ScoredMatch], threshold: f32) -> RouteSelection {
        let outcome = GateOutcome::evaluate(matches, threshold);

        if !outcome.is_passed() {
            debug!(
                outcome = outcome.debug_status(),
                top_score = ?outcome.top_score(),
                threshold,
                "Confidence gate not met, using default route"
            );
            return RouteSelection {
                candidate: self.default_candidate(),
                outcome,
            };
        }

        let aggregator = RouteAggregator::from_matches(matches);
        let routes = aggregator.len();

        let candidate = match aggregator.into_best() {
            Some(best) => RouteCandidate {
                name: best.route,
                model: best.model,
                confidence: best.score,
                metadata: best.metadata,
            },
            None => self.default_candidate(),
        };

        debug!(
            route = %candidate.name,
            confidence = candidate.confidence,
            routes,
            "Route selected"
        );

        RouteSelection { candidate, outcome }
    }
}
