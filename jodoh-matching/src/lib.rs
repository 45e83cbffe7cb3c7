pub mod config;
pub mod matching;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use matching::MatchEngine;

pub struct AppState {
    pub engine: MatchEngine,
    pub metrics: PrometheusHandle,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Profile store
        .route("/profiles", post(routes::profiles::register))
        .route("/profiles/:id", get(routes::profiles::get_profile))
        .route("/profiles/:id/exists", get(routes::profiles::exists))
        .route("/profiles/:id/overview", get(routes::profiles::overview))
        .route("/profiles/:id/stats", get(routes::profiles::stats))
        // Candidate selection and decisions
        .route(
            "/profiles/:id/next-candidate",
            get(routes::profiles::next_candidate),
        )
        .route(
            "/profiles/:id/decisions",
            get(routes::profiles::list_decisions),
        )
        .route("/decisions", post(routes::decisions::record_decision))
        .route(
            "/decisions/:actor/:target",
            get(routes::decisions::check_decision),
        )
        // Matches
        .route("/profiles/:id/matches", get(routes::matches::list_matches))
        .route("/matches/:a/:b", get(routes::matches::check_match))
        .route_layer(middleware::from_fn(
            jodoh_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
