use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::constants::HEALTH_PROBE_TEXT;

/// Path of the embed endpoint, relative to the service base URL.
pub const EMBED_PATH: &str = "/embed";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub vector: Vec<f32>,
    /// Dimension reported by the service; checked against `vector` when present.
    #[serde(default)]
    pub dimensions: Option<usize>,
    /// Server-side inference time.
    #[serde(default)]
    pub latency_ms: Option<f32>,
}

/// HTTP client for the embedding service.
///
/// Connections are pooled by `reqwest`. No request timeout is set here: the routing
/// pipeline and the health probe each bound the call with their own deadline.
#[derive(Clone)]
pub struct HttpEmbeddingClient {
    http: HttpClient,
    base_url: String,
    endpoint: String,
}

impl std::fmt::Debug for HttpEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbeddingClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpEmbeddingClient {
    /// Creates a client for the service at `base_url` (e.g. `http://embedder:50052`).
    pub fn new(base_url: &str) -> Result<Self, EmbeddingError> {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|e| EmbeddingError::ClientInit {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{}{}", base_url, EMBED_PATH);

        Ok(Self {
            http,
            base_url,
            endpoint,
        })
    }

    /// Returns the configured base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&EmbedRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        if body.vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse {
                reason: "empty vector".to_string(),
            });
        }

        if let Some(dimensions) = body.dimensions
            && dimensions != body.vector.len()
        {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "reported {} dimensions but vector has {}",
                    dimensions,
                    body.vector.len()
                ),
            });
        }

        debug!(
            dim = body.vector.len(),
            server_latency_ms = body.latency_ms,
            "Embedding received"
        );

        Ok(body.vector)
    }

    pub async fn health_check(&self) -> Result<(), EmbeddingError> {
        self.embed(HEALTH_PROBE_TEXT).await.map(|_| ())
    }
}

impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text).await
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        self.health_check().await
    }
}
