//! Run the filtered records query.

use std::sync::Arc;

use axum::{extract, Json};
use tracing::{info_span, Instrument};

use query_engine_execution::execution::execute;
use query_engine_execution::result_set::ResultSet;
use query_engine_execution::Error;
use query_engine_sql::sql;
use query_engine_translation::translation;
use query_engine_translation::translation::filters::FilterCriteria;

use crate::extract::Filters;
use crate::response::DashboardResponse;
use crate::state;

/// `POST /query`
///
/// Fields that fail validation are ignored, so a bad filter never fails the request.
/// Only a body that is neither a JSON object nor a form is rejected.
pub async fn query(
    extract::State(state): extract::State<Arc<state::State>>,
    Filters(filters): Filters,
) -> Json<DashboardResponse> {
    let statement = async {
        let criteria = FilterCriteria::from_raw(filters);
        translation::query::build_filtered_query(&state.configuration.table, &criteria)
    }
    .instrument(info_span!("Plan query"))
    .await;

    let result = run_statement(&state, &statement)
        .instrument(info_span!("Execute query"))
        .await;

    Json(DashboardResponse::from_result(result))
}

/// Open a connection, run a statement on it and count the outcome.
pub(crate) async fn run_statement(
    state: &state::State,
    statement: &sql::string::SQL,
) -> Result<ResultSet, Error> {
    let result = match state.connector.acquire().await {
        Ok(connection) => execute(statement, connection).await,
        Err(err) => {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "dashboard",
                event.name = "Connection error",
                name = "Connection error",
                body = %err,
                error = true,
            );
            Err(err)
        }
    };
    state.metrics.record_query(&result);
    result
}
