use super::error::EmbeddingError;

/// Remote capability that turns text into a fixed-length vector.
///
/// Implementations must not retry internally; callers apply their own timeouts by
/// wrapping the returned futures, and dropping a future aborts the call.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text`.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Performs a lightweight round-trip to the provider.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), EmbeddingError>> + Send;
}
