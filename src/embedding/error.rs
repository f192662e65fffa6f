use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to build embedding client for '{url}': {message}")]
    ClientInit { url: String, message: String },

    #[error("embedding request to '{url}' failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("embedding service returned {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },
}
