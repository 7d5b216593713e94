//! Prometheus metrics exposition.

use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Safe to call more than once; the
/// first installation wins.
pub fn install_recorder() -> &'static PrometheusHandle {
    HANDLE.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    })
}

/// Router exposing `GET /metrics` in Prometheus text format.
pub fn metrics_router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    let handle = install_recorder().clone();
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}
