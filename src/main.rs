//! docuchat entry point.
//!
//! Wiring is explicit: load config, build the provider clients, run the
//! startup ingestion sync (any failure aborts startup), then serve.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docuchat::config::AppConfig;
use docuchat::services::AppState;
use docuchat::store::VectorStore;
use docuchat::{chat, embeddings, metrics, routes, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.rust_log))
        .init();

    info!("Starting docuchat v{VERSION}");

    metrics::install_recorder();

    let config = Arc::new(config);
    let embedder = embeddings::create_embedder(&config.embedding);
    let chat_client = chat::create_chat_client(&config.chat);

    info!(
        embedding_model = embedder.model_name(),
        chat_model = chat_client.model_name(),
        pdf_dir = %config.storage.pdf_dir,
        "Providers configured"
    );

    let store = Arc::new(RwLock::new(VectorStore::new()));
    let state = AppState::new(config.clone(), store.clone(), embedder, chat_client);

    // Startup ingestion: load existing vector files, embed anything new.
    // A single failing document aborts startup.
    {
        let mut store = store.write().await;
        let report = state.ingest.sync(&mut store).await?;
        info!(
            documents = report.documents_loaded + report.documents_embedded,
            chunks = report.chunks_total,
            "Vector store ready"
        );
    }

    let app = routes::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
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
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
