//! Route corpus seeding.
//!
//! Loads route definitions (name, model, example utterances), embeds every utterance
//! with the same [`EmbeddingProvider`](crate::embedding::EmbeddingProvider) the router
//! uses, and rewrites the collection from scratch.

mod error;
mod seeder;
mod types;

#[cfg(test)]
mod tests;

pub use error::SeedError;
pub use seeder::{DIMENSION_PROBE_TEXT, RouteSeeder, SeedReport};
pub use types::{RouteDefinition, RoutesFile};
