//! Route decision logic and the request pipeline.
//!
//! A request flows strictly in sequence: embed the query, search the route corpus,
//! then aggregate the matches per route and gate on the top match.
//!
//! # Gate vs. confidence
//!
//! The confidence gate only looks at the single best match (`matches[0].score`), while
//! the reported confidence is the *sum* of scores for the winning route. A route is
//! admitted by one strong signal and then rewarded for corroborating matches, so the
//! confidence may exceed `1.0`.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod health;
pub mod pipeline;
pub mod selector;
pub mod types;


pub use aggregator::{RouteAggregate, RouteAggregator};
pub use config::RoutingConfig;
pub use error::{RoutingError, RoutingResult};
pub use health::{HealthProbe, HealthStatus};
pub use pipeline::RoutingPipeline;
pub use selector::{GateOutcome, RouteSelection, RouteSelector};
pub use types::{RouteCandidate, RouteDecision, RouteQuery};
