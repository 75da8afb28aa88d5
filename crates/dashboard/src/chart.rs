//! Count the filtered records per value of a column.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::{extract, Json};
use serde::Deserialize;
use tracing::{info_span, Instrument};

use query_engine_translation::translation;
use query_engine_translation::translation::filters::FilterCriteria;
use query_engine_translation::translation::query::ChartDimension;

use crate::extract::{Filters, Rejected};
use crate::query::run_statement;
use crate::response::DashboardResponse;
use crate::state;

#[derive(Debug, Clone, Deserialize)]
pub struct ChartParams {
    pub dimension: ChartDimension,
}

/// `POST /chart?dimension=region|sex|age|diagnosis`
pub async fn chart(
    extract::State(state): extract::State<Arc<state::State>>,
    params: Result<extract::Query<ChartParams>, QueryRejection>,
    Filters(filters): Filters,
) -> Result<Json<DashboardResponse>, Rejected> {
    let extract::Query(params) = params.map_err(|err| Rejected::new(err.body_text()))?;
    let criteria = FilterCriteria::from_raw(filters);
    let statement = translation::query::build_chart_query(
        &state.configuration.table,
        &criteria,
        params.dimension,
    );

    let result = run_statement(&state, &statement)
        .instrument(info_span!("Execute chart query", dimension = ?params.dimension))
        .await;

    Ok(Json(DashboardResponse::from_result(result)))
}
