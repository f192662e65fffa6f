use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::time::Instant;
use tracing::{debug, error, instrument};

use crate::constants::{ROUTER_STATUS_DEFAULT, ROUTER_STATUS_HEADER, ROUTER_STATUS_ROUTED};
use crate::embedding::EmbeddingProvider;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{HealthResponse, RouteRequest, RouteResponse, RpcHealthResponse};
use crate::gateway::state::RouterState;
use crate::vectordb::VectorIndex;

#[instrument(skip(state, request), fields(route = tracing::field::Empty))]
pub async fn route_handler<E, V>(
    State(state): State<RouterState<E, V>>,
    request: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    let Json(request) =
        request.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    validate_route_request(&request)?;

    let query = request.to_query();
    let result = match request.timeout() {
        Some(timeout) => {
            debug!(timeout_ms = request.timeout_ms, "Routing with caller deadline");
            state
                .pipeline
                .route_with_deadline(&query, Instant::now() + timeout)
                .await
        }
        None => state.pipeline.route(&query).await,
    };

    let decision = result.map_err(|e| {
        error!(error = %e, "Routing failed");
        GatewayError::from(e)
    })?;
    tracing::Span::current().record("route", tracing::field::display(&decision.route));

    let status = if decision.is_fallback() {
        ROUTER_STATUS_DEFAULT
    } else {
        ROUTER_STATUS_ROUTED
    };

    let mut headers = HeaderMap::new();
    headers.insert(ROUTER_STATUS_HEADER, HeaderValue::from_static(status));

    Ok((
        StatusCode::OK,
        headers,
        Json(RouteResponse::from(decision)),
    )
        .into_response())
}

pub fn validate_route_request(request: &RouteRequest) -> Result<(), GatewayError> {
    if request.query.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "query cannot be empty".to_string(),
        ));
    }
    if !request.score_threshold.is_finite() {
        return Err(GatewayError::InvalidRequest(
            "score_threshold must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Always 200; dependency state is reported in the body.
#[instrument(skip(state))]
pub async fn rpc_health_handler<E, V>(State(state): State<RouterState<E, V>>) -> Json<RpcHealthResponse>
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    Json(RpcHealthResponse::from(state.health.check().await))
}

#[instrument(skip(state))]
pub async fn health_handler<E, V>(State(state): State<RouterState<E, V>>) -> Response
where
    E: EmbeddingProvider + 'static,
    V: VectorIndex + 'static,
{
    let status = state.health.check().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(HealthResponse::from(status))).into_response()
}

/// Liveness only.
pub async fn ready_handler() -> &'static str {
    "ok"
}
