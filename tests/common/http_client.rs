//! HTTP client helpers for tests.

use std::time::Duration;

use llm_router::gateway::payload::{HealthResponse, RouteRequest, RouteResponse, RpcHealthResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Returns the decision and the `x-router-status` header.
    pub async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<(RouteResponse, String), TestClientError> {
        let resp = self
            .client
            .post(self.url("/v1/route"))
            .json(request)
            .send()
            .await?;

        let status_header = resp
            .headers()
            .get(llm_router::ROUTER_STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, status_header)),
            400 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn rpc_health(&self) -> Result<RpcHealthResponse, TestClientError> {
        Ok(self
            .client
            .get(self.url("/v1/health"))
            .send()
            .await?
            .json()
            .await?)
    }

    /// Returns the HTTP status alongside the body (503 still carries a body).
    pub async fn health(&self) -> Result<(u16, HealthResponse), TestClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    pub async fn ready(&self) -> Result<(u16, String), TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.text().await?))
    }
}
