//! Semantic LLM router library (used by the server binary and integration tests).
//!
//! A query is embedded, matched against a corpus of example utterances stored in Qdrant,
//! and the best-supported route (with its downstream model) is returned. When the
//! strongest single match is not confident enough, a configured default model is used.
//!
//! # Modules
//! - [`routing`] - aggregation, confidence gate, request pipeline, health probe
//! - [`embedding`] - [`EmbeddingProvider`] seam and the HTTP embedding client
//! - [`vectordb`] - [`VectorIndex`]/[`VectorStore`] seams and the Qdrant client
//! - [`seed`] - rebuilding the route collection from a routes file
//! - [`gateway`] - RPC (JSON over HTTP) and health routers
//! - [`config`] - `ROUTER_*` environment configuration
//!
//! ## Test/Mock Support
//! `MockEmbedder` and `MockVectorIndex` are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod routing;
pub mod seed;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_ROUTE_NAME, ROUTER_STATUS_HEADER};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{EmbeddingError, EmbeddingProvider, HttpEmbeddingClient};
pub use gateway::{GatewayError, RouterState, create_health_router, create_rpc_router};
pub use routing::{
    GateOutcome, HealthProbe, HealthStatus, RouteAggregator, RouteCandidate, RouteDecision,
    RouteQuery, RouteSelector, RoutingConfig, RoutingError, RoutingPipeline,
};
pub use seed::{RouteDefinition, RouteSeeder, RoutesFile, SeedError, SeedReport};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{
    EqualityFilter, QdrantClient, RoutePoint, ScoredMatch, VectorDbError, VectorIndex,
    VectorStore,
};
