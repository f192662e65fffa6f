//! Qdrant vector index integration.
//!
//! The routing pipeline only needs [`VectorIndex`] (search + liveness). Seeding also
//! needs [`VectorStore`] to (re)create the collection and write points.

pub mod client;
pub mod error;
pub mod filter;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantClient, VectorIndex, VectorStore};
pub use error::VectorDbError;
pub use filter::EqualityFilter;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, SearchRecord, cosine_similarity};
pub use model::{RoutePoint, ScoredMatch, payload_value_to_string};
