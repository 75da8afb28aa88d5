//! The HTTP routes of the dashboard.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{extract, Router};

use super::{ask, chart, health, query, schema, state};

/// Build the router over a shared state.
pub fn create_router(state: Arc<state::State>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(get_metrics))
        .route("/query", post(query::query))
        .route("/chart", post(chart::chart))
        .route("/schema", get(schema::schema))
        .route("/ask", post(ask::ask))
        .with_state(state)
}

/// `GET /metrics` in the Prometheus text format.
async fn get_metrics(
    extract::State(state): extract::State<Arc<state::State>>,
) -> Result<String, StatusCode> {
    prometheus::TextEncoder::new()
        .encode_to_string(&state.metrics_registry.gather())
        .map_err(|err| {
            tracing::error!(error = %err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
