//! The JSON body every data endpoint answers with.

use serde::{Deserialize, Serialize};

use query_engine_execution::result_set::{ResultSet, Row};
use query_engine_execution::Error;

/// Rows and column names on success. No rows and an error message on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// The statement the language model produced. Only present for questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_sql: Option<String>,
    /// `generated_sql`, laid out for reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_sql: Option<String>,
    pub error: Option<String>,
}

impl DashboardResponse {
    pub fn from_result(result: Result<ResultSet, Error>) -> Self {
        match result {
            Ok(result_set) => DashboardResponse {
                columns: result_set.columns,
                rows: result_set.rows,
                ..DashboardResponse::default()
            },
            Err(err) => DashboardResponse::failed(&err),
        }
    }

    pub fn failed(err: &Error) -> Self {
        DashboardResponse::rejected(err.to_string())
    }

    /// No rows, only the reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        DashboardResponse {
            error: Some(message.into()),
            ..DashboardResponse::default()
        }
    }

    /// Attach a generated statement and its formatted form.
    #[must_use]
    pub fn with_generated_sql(self, generated_sql: &str) -> Self {
        let formatted_sql = if generated_sql.is_empty() {
            String::new()
        } else {
            sqlformat::format(
                generated_sql,
                &sqlformat::QueryParams::None,
                sqlformat::FormatOptions::default(),
            )
        };
        DashboardResponse {
            generated_sql: Some(generated_sql.to_string()),
            formatted_sql: Some(formatted_sql),
            ..self
        }
    }
}
