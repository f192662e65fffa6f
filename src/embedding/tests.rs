use std::net::SocketAddr;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use tokio::net::TcpListener;

use super::*;

async fn spawn_embed_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn echo_length_router() -> Router {
    Router::new().route(
        EMBED_PATH,
        post(|Json(req): Json<EmbedRequest>| async move {
            let len = req.text.len() as f32;
            Json(EmbedResponse {
                vector: vec![len, 1.0, 0.0],
                dimensions: Some(3),
                latency_ms: Some(1.5),
            })
        }),
    )
}

#[tokio::test]
async fn test_http_client_embeds_text() {
    let addr = spawn_embed_server(echo_length_router()).await;
    let client = HttpEmbeddingClient::new(&format!("http://{}/", addr)).unwrap();

    assert_eq!(client.base_url(), format!("http://{}", addr));

    let vector = client.embed("hello").await.expect("embed should succeed");
    assert_eq!(vector, vec![5.0, 1.0, 0.0]);
}

#[tokio::test]
async fn test_http_client_health_check() {
    let addr = spawn_embed_server(echo_length_router()).await;
    let client = HttpEmbeddingClient::new(&format!("http://{}", addr)).unwrap();

    assert!(client.health_check().await.is_ok());
}

#[tokio::test]
async fn test_http_client_service_error() {
    let router = Router::new().route(
        EMBED_PATH,
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let addr = spawn_embed_server(router).await;
    let client = HttpEmbeddingClient::new(&format!("http://{}", addr)).unwrap();

    let err = client.embed("hello").await.unwrap_err();
    match err {
        EmbeddingError::ServiceError { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("model not loaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_rejects_empty_vector() {
    let router = Router::new().route(
        EMBED_PATH,
        post(|| async {
            Json(EmbedResponse {
                vector: vec![],
                dimensions: None,
                latency_ms: None,
            })
        }),
    );
    let addr = spawn_embed_server(router).await;
    let client = HttpEmbeddingClient::new(&format!("http://{}", addr)).unwrap();

    let err = client.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_http_client_rejects_dimension_mismatch() {
    let router = Router::new().route(
        EMBED_PATH,
        post(|| async {
            Json(EmbedResponse {
                vector: vec![0.1, 0.2],
                dimensions: Some(384),
                latency_ms: None,
            })
        }),
    );
    let addr = spawn_embed_server(router).await;
    let client = HttpEmbeddingClient::new(&format!("http://{}", addr)).unwrap();

    let err = client.embed("hello").await.unwrap_err();
    assert!(err.to_string().contains("384"));
}

#[tokio::test]
async fn test_http_client_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpEmbeddingClient::new(&format!("http://{}", addr)).unwrap();
    let err = client.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::RequestFailed { .. }));
}

#[tokio::test]
async fn test_mock_embedder_is_deterministic() {
    let embedder = MockEmbedder::default();

    let a = embedder.embed("refund my invoice").await.unwrap();
    let b = embedder.embed("Refund my invoice!").await.unwrap();

    assert_eq!(a.len(), MOCK_EMBEDDING_DIM);
    assert_eq!(a, b);
    assert_eq!(embedder.calls(), 2);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_mock_embedder_shared_words_are_similar() {
    let embedder = MockEmbedder::default();

    let query = embedder.vector_for("billing invoice question");
    let close = embedder.vector_for("invoice billing");
    let far = embedder.vector_for("kubernetes deployment");

    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    assert!(dot(&query, &close) > dot(&query, &far));
}

#[tokio::test]
async fn test_mock_embedder_failure_toggle() {
    let embedder = MockEmbedder::failing();
    assert!(embedder.embed("x").await.is_err());
    assert!(embedder.health_check().await.is_err());

    embedder.set_failing(false);
    assert!(embedder.embed("x").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_mock_embedder_latency_uses_tokio_clock() {
    let embedder = MockEmbedder::default().with_latency(Duration::from_secs(5));

    let start = tokio::time::Instant::now();
    embedder.embed("slow").await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn test_mock_embedder_fixed_vector() {
    let embedder = MockEmbedder::default().with_fixed_vector(vec![1.0, 0.0]);
    assert_eq!(embedder.dim(), 2);
    assert_eq!(embedder.embed("anything").await.unwrap(), vec![1.0, 0.0]);
}
