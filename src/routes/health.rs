//! Liveness endpoint with corpus stats.

use axum::{extract::State, Json};
use serde_json::json;

use crate::services::AppState;
use crate::VERSION;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.read().await;
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "documents": store.document_names().len(),
        "chunks": store.len(),
    }))
}
