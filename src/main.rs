//! Router server entrypoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

use llm_router::config::Config;
use llm_router::embedding::HttpEmbeddingClient;
use llm_router::gateway::{RouterState, check_ready, create_health_router, create_rpc_router};
use llm_router::routing::RoutingPipeline;
use llm_router::seed::RouteSeeder;
use llm_router::vectordb::QdrantClient;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let embedder = Arc::new(HttpEmbeddingClient::new(&config.embedding_url)?);
    let qdrant = Arc::new(QdrantClient::new(&config.qdrant_url())?);

    if let Some(path) = seed_path_arg()? {
        let seeder = RouteSeeder::new(embedder, qdrant, config.collection.clone());
        let report = seeder.seed_file(&path).await?;
        tracing::info!(
            routes = report.routes,
            points = report.points,
            dimension = report.dimension,
            "Seeded route collection"
        );
        return Ok(());
    }

    tracing::info!(
        bind_addr = %config.bind_addr,
        rpc_port = config.rpc_port,
        http_port = config.http_port,
        embedding_url = %config.embedding_url,
        qdrant_url = %config.qdrant_url(),
        collection = %config.collection,
        "Router starting"
    );

    if let Err(e) = qdrant.health_check().await {
        tracing::warn!(error = %e, "Qdrant not reachable at startup, requests will fail until it is");
    }

    let pipeline = RoutingPipeline::new(embedder, qdrant, config.routing_config());
    let state = RouterState::new(pipeline);

    let rpc_listener = TcpListener::bind(config.rpc_socket_addr()).await?;
    let http_listener = TcpListener::bind(config.http_socket_addr()).await?;
    tracing::info!(addr = %rpc_listener.local_addr()?, "RPC server listening");
    tracing::info!(addr = %http_listener.local_addr()?, "Health server listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let rpc_app = create_rpc_router(state.clone());
    let http_app = create_health_router(state);
    let rpc_shutdown = wait_for_shutdown(shutdown_rx.clone());
    let http_shutdown = wait_for_shutdown(shutdown_rx);

    tokio::try_join!(
        async move {
            axum::serve(rpc_listener, rpc_app)
                .with_graceful_shutdown(rpc_shutdown)
                .await
        },
        async move {
            axum::serve(http_listener, http_app)
                .with_graceful_shutdown(http_shutdown)
                .await
        },
    )?;

    tracing::info!("Router shutdown complete");
    Ok(())
}

/// Path following `--seed`, if the flag is present.
fn seed_path_arg() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let path = args.next().context("--seed requires a routes file path")?;
            return Ok(Some(PathBuf::from(path)));
        }
    }
    Ok(None)
}

async fn run_health_check() -> i32 {
    let port = std::env::var("ROUTER_HTTP_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .filter(|p| *p != 0)
        .unwrap_or(llm_router::config::DEFAULT_HTTP_PORT);

    let base_url = format!("http://127.0.0.1:{}", port);
    if check_ready(&base_url).await { 0 } else { 1 }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
