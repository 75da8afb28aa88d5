//! Answer a question in natural language.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract, Json};
use serde::{Deserialize, Serialize};

use query_engine_execution::introspection::introspect_schema;
use query_engine_execution::natural_language::{translate_and_run, Translated};

use crate::extract::Rejected;
use crate::response::DashboardResponse;
use crate::state;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// `POST /ask`
///
/// The schema is introspected on one connection. A second one is opened only once a
/// statement has been generated and accepted.
/// When no statement could be generated, `generatedSql` is empty and `error` says why.
pub async fn ask(
    extract::State(state): extract::State<Arc<state::State>>,
    request: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<DashboardResponse>, Rejected> {
    let Json(request) = request.map_err(|err| Rejected::new(err.body_text()).for_question())?;

    let schema = match state.connector.acquire().await {
        Ok(connection) => {
            introspect_schema(&state.configuration.introspection_owner, connection).await
        }
        Err(err) => return Ok(Json(DashboardResponse::failed(&err).with_generated_sql(""))),
    };

    let translated = translate_and_run(
        &request.question,
        &schema,
        state.connector.as_ref(),
        state.completion.as_ref(),
        state.configuration.generation.policy,
    )
    .await;

    match translated {
        Ok(Translated {
            generated_sql,
            result,
        }) => {
            state.metrics.translation_total.inc();
            state.metrics.record_query(&result);
            Ok(Json(
                DashboardResponse::from_result(result).with_generated_sql(&generated_sql.sql),
            ))
        }
        Err(err) => {
            state.metrics.translation_error_total.inc();
            Ok(Json(DashboardResponse::failed(&err).with_generated_sql("")))
        }
    }
}
