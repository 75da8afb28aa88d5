//! Describe the tables the language model is told about.

use std::sync::Arc;

use axum::{extract, Json};
use serde::{Deserialize, Serialize};

use query_engine_execution::introspection::introspect_schema;
use query_engine_metadata::metadata::SchemaMap;

use crate::state;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaParams {
    /// Defaults to the configured owner.
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub owner: String,
    pub tables: SchemaMap,
    /// The schema as it appears in prompts.
    pub rendered: String,
    pub error: Option<String>,
}

/// `GET /schema?owner=...`
pub async fn schema(
    extract::State(state): extract::State<Arc<state::State>>,
    extract::Query(params): extract::Query<SchemaParams>,
) -> Json<SchemaResponse> {
    let owner = params
        .owner
        .filter(|owner| !owner.trim().is_empty())
        .unwrap_or_else(|| state.configuration.introspection_owner.clone());

    let (tables, error) = match state.connector.acquire().await {
        Ok(connection) => (introspect_schema(&owner, connection).await, None),
        Err(err) => (SchemaMap::empty(), Some(err.to_string())),
    };

    Json(SchemaResponse {
        owner,
        rendered: tables.render(),
        tables,
        error,
    })
}
