//! Embedding provider boundary.
//!
//! The router never computes embeddings itself. [`EmbeddingProvider`] is the seam:
//! [`HttpEmbeddingClient`] talks to the remote embedding service, and
//! `MockEmbedder` (behind the `mock` feature) produces deterministic vectors for tests.

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod provider;

#[cfg(test)]
mod tests;

pub use client::{EMBED_PATH, EmbedRequest, EmbedResponse, HttpEmbeddingClient};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MOCK_EMBEDDING_DIM, MockEmbedder};
pub use provider::EmbeddingProvider;
