//! Health check endpoint for the dashboard.

use std::sync::Arc;

use axum::extract;
use axum::http::StatusCode;

use query_engine_execution::connection::Connector;
use query_engine_execution::execution::execute;
use query_engine_execution::Error;
use query_engine_sql::sql;

use crate::state;

/// Check that a connection can be opened and can run a trivial statement.
pub async fn health_check(connector: &dyn Connector) -> Result<(), Error> {
    let connection = connector.acquire().await?;
    execute(&sql::string::SQL::raw("SELECT 1"), connection)
        .await
        .map(|_| ())
}

/// `GET /health`
pub async fn health(extract::State(state): extract::State<Arc<state::State>>) -> StatusCode {
    match health_check(state.connector.as_ref()).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "dashboard",
                event.name = "Health check error",
                name = "Health check error",
                body = %err,
                error = true,
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
