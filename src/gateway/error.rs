use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{ROUTER_STATUS_ERROR, ROUTER_STATUS_HEADER};
use crate::routing::RoutingError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("vector search failed: {0}")]
    SearchFailed(String),
}

impl From<RoutingError> for GatewayError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::EmbeddingFailed { reason } => GatewayError::EmbeddingFailed(reason),
            RoutingError::SearchFailed { reason } => GatewayError::SearchFailed(reason),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::EmbeddingFailed(_) | GatewayError::SearchFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            ROUTER_STATUS_HEADER,
            HeaderValue::from_static(ROUTER_STATUS_ERROR),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
