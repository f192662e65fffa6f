//! HTTP surfaces.
//!
//! The RPC port serves route decisions as JSON (`POST /v1/route`) plus a dependency
//! report (`GET /v1/health`). The HTTP port serves `GET /health` (503 unless both
//! dependencies respond) and `GET /ready` (liveness only).

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{health_handler, ready_handler, route_handler, rpc_health_handler};
pub use state::RouterState;

use crate::embedding::EmbeddingProvider;
use crate::vectordb::VectorIndex;

pub const ROUTE_PATH: &str = "/v1/route";
pub const RPC_HEALTH_PATH: &str = "/v1/health";
pub const HEALTH_PATH: &str = "/health";
pub const READY_PATH: &str = "/ready";

/// Bound on the `--health-check` request.
pub const READY_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

pub fn create_rpc_router<E, V>(state: RouterState<E, V>) -> Router
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    Router::new()
        .route(ROUTE_PATH, post(route_handler))
        .route(RPC_HEALTH_PATH, get(rpc_health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_health_router<E, V>(state: RouterState<E, V>) -> Router
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .route(READY_PATH, get(ready_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET {base_url}/ready`; connection errors, timeouts and non-2xx all read as not ready.
pub async fn check_ready(base_url: &str) -> bool {
    let Ok(client) = reqwest::Client::builder()
        .timeout(READY_CHECK_TIMEOUT)
        .build()
    else {
        return false;
    };

    let url = format!("{}{}", base_url.trim_end_matches('/'), READY_PATH);
    match client.get(&url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Readiness request failed");
            false
        }
    }
}
