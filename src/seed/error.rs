use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors raised while seeding the route collection.
pub enum SeedError {
    /// Routes file could not be read.
    #[error("failed to read routes file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Routes file is not valid JSON for the expected shape.
    #[error("failed to parse routes file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no routes defined")]
    NoRoutes,

    /// A route definition failed validation.
    #[error("invalid route '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] VectorDbError),
}
