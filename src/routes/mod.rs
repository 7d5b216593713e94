pub mod health;
pub mod pages;
pub mod rag;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::metrics;
use crate::services::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let metrics_router = metrics::metrics_router();

    Router::new()
        // HTML UI
        .route("/", get(pages::index))
        .route("/upload", get(pages::upload_form))
        .route("/upload", post(pages::handle_upload))
        .route("/askQuestion", get(pages::ask_form))
        .route("/askQuestion", post(pages::ask_submit))
        // REST
        .route("/ask", get(rag::ask))
        .route("/ask1", get(rag::ask_canned))
        .route("/chat", get(rag::chat))
        .route("/health", get(health::health))
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(ConcurrencyLimitLayer::new(
            state.config.server.max_concurrent_requests,
        ))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .with_state(state)
}
