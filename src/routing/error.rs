use thiserror::Error;

#[derive(Debug, Error)]
/// Failures of a routing request.
///
/// Both kinds are fail-fast: the pipeline never substitutes the default route for an
/// infrastructure error.
pub enum RoutingError {
    /// The embedding provider was unreachable, timed out, or returned an error.
    #[error("embedding failed: {reason}")]
    EmbeddingFailed {
        /// Error message.
        reason: String,
    },

    /// The vector index was unreachable or rejected the query.
    #[error("vector search failed: {reason}")]
    SearchFailed {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
