//! Test server harness.
//!
//! Spawns both routers (RPC and health) on ephemeral ports with in-memory
//! dependencies, seeded from a routes file.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::post};
use llm_router::embedding::{EMBED_PATH, EmbedRequest, EmbedResponse, EmbeddingProvider, MockEmbedder};
use llm_router::gateway::{RouterState, create_health_router, create_rpc_router};
use llm_router::routing::{RoutingConfig, RoutingPipeline};
use llm_router::seed::{RouteDefinition, RouteSeeder, RoutesFile};
use llm_router::vectordb::MockVectorIndex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
pub const TEST_COLLECTION_NAME: &str = "router_test_routes";
pub const TEST_DEFAULT_MODEL: &str = "test-default-model";
pub const TEST_EMBEDDING_DIM: usize = 64;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub routes: RoutesFile,
    pub score_threshold: f32,
    pub top_k: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            routes: sample_routes(),
            score_threshold: 0.5,
            top_k: 3,
        }
    }
}

/// Three routes with disjoint vocabularies.
pub fn sample_routes() -> RoutesFile {
    RoutesFile {
        routes: vec![
            RouteDefinition::new("billing", "gpt-4o")
                .with_provider("openai")
                .with_metadata("tier", "pro")
                .with_utterance("refund my invoice")
                .with_utterance("charged twice on my invoice")
                .with_utterance("update my credit card"),
            RouteDefinition::new("code", "claude-sonnet")
                .with_provider("anthropic")
                .with_utterance("write a rust function")
                .with_utterance("fix this python bug")
                .with_utterance("explain this compiler error"),
            RouteDefinition::new("chitchat", "gpt-4o-mini")
                .with_utterance("how are you today")
                .with_utterance("tell me a joke"),
        ],
    }
}

pub struct TestServer {
    pub rpc_addr: SocketAddr,
    pub http_addr: SocketAddr,
    pub index: Arc<MockVectorIndex>,
    _handles: Vec<JoinHandle<()>>,
    shutdown_txs: Vec<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn rpc_url(&self) -> String {
        format!("http://{}", self.rpc_addr)
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.http_addr)
    }

    pub async fn shutdown(mut self) {
        for tx in self.shutdown_txs.drain(..) {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for tx in self.shutdown_txs.drain(..) {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

async fn serve(
    router: Router,
) -> Result<(SocketAddr, JoinHandle<()>, oneshot::Sender<()>), ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok((addr, handle, shutdown_tx))
}

/// Spawns both servers over a [`MockEmbedder`] and a seeded [`MockVectorIndex`].
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    spawn_test_server_with(Arc::new(MockEmbedder::new(TEST_EMBEDDING_DIM)), config).await
}

/// Same as [`spawn_test_server`], with any embedding provider (seeding uses it too).
pub async fn spawn_test_server_with<E>(
    embedder: Arc<E>,
    config: TestServerConfig,
) -> Result<TestServer, ServerStartupError>
where
    E: EmbeddingProvider + 'static,
{
    let index = Arc::new(MockVectorIndex::new());

    RouteSeeder::new(Arc::clone(&embedder), Arc::clone(&index), TEST_COLLECTION_NAME)
        .seed(&config.routes)
        .await
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let routing = RoutingConfig::default()
        .collection_name(TEST_COLLECTION_NAME)
        .default_model(TEST_DEFAULT_MODEL)
        .score_threshold(config.score_threshold)
        .top_k(config.top_k);

    let state = RouterState::new(RoutingPipeline::new(embedder, Arc::clone(&index), routing));

    let (rpc_addr, rpc_handle, rpc_tx) = serve(create_rpc_router(state.clone())).await?;
    let (http_addr, http_handle, http_tx) = serve(create_health_router(state)).await?;

    Ok(TestServer {
        rpc_addr,
        http_addr,
        index,
        _handles: vec![rpc_handle, http_handle],
        shutdown_txs: vec![rpc_tx, http_tx],
    })
}

/// Embedding service stand-in speaking the `/embed` protocol, backed by `embedder`.
pub async fn spawn_embedding_service(
    embedder: Arc<MockEmbedder>,
) -> Result<(SocketAddr, oneshot::Sender<()>), ServerStartupError> {
    let router = Router::new().route(
        EMBED_PATH,
        post(move |Json(req): Json<EmbedRequest>| {
            let embedder = Arc::clone(&embedder);
            async move {
                let vector = embedder.vector_for(&req.text);
                Json(EmbedResponse {
                    dimensions: Some(vector.len()),
                    vector,
                    latency_ms: Some(0.1),
                })
            }
        }),
    );

    let (addr, _handle, tx) = serve(router).await?;
    Ok((addr, tx))
}
