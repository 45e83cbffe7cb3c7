use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jodoh_shared::types::api::{HealthCheck, HealthResponse};

use crate::AppState;

/// GET /health - 503 when the backing store does not answer
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let probe = state.engine.ping_store().await;
    if let Err(e) = &probe {
        tracing::warn!(error = %e, "store health check failed");
    }

    let store = HealthCheck::from_probe(state.engine.store_kind(), probe);
    let response = HealthResponse::from_checks("jodoh-matching", env!("CARGO_PKG_VERSION"), vec![store]);
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
