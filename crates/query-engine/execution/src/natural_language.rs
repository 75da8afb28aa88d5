//! Answer a question in natural language by generating a statement and running it.

use tracing::{info_span, Instrument};

use disease_dashboard_configuration::GeneratedSqlPolicy;
use query_engine_metadata::metadata::SchemaMap;
use query_engine_sql::sql;
use query_engine_translation::translation::natural_language;

use crate::completion::CompletionService;
use crate::connection::Connector;
use crate::error::Error;
use crate::execution::{execute, execute_read_only};
use crate::result_set::ResultSet;

/// A generated statement and the outcome of running it.
#[derive(Debug)]
pub struct Translated {
    pub generated_sql: sql::string::SQL,
    pub result: Result<ResultSet, Error>,
}

/// Ask the completion service for a statement answering `question`, then run it.
///
/// Returns `Err` when no statement could be produced: the service failed, answered with
/// nothing, or answered with something the policy rejects. A connection is only opened once a
/// statement is ready. Under the read-only policy the statement runs in a read-only
/// transaction.
pub async fn translate_and_run(
    question: &str,
    schema: &SchemaMap,
    connector: &dyn Connector,
    completion: &dyn CompletionService,
    policy: GeneratedSqlPolicy,
) -> Result<Translated, Error> {
    let generated_sql = async {
        let prompt = natural_language::render_prompt(question, schema);
        let raw = completion.complete(&prompt).await?;
        tracing::debug!(raw = %raw, "completion returned");
        Ok::<_, Error>(natural_language::prepare_generated_sql(&raw, policy)?)
    }
    .instrument(info_span!("Translate question"))
    .await
    .map_err(|err| {
        tracing::error!(
            meta.signal_type = "log",
            event.domain = "dashboard",
            event.name = "Translation error",
            name = "Translation error",
            body = %err,
            error = true,
        );
        err
    })?;

    tracing::info!(generated_sql = %generated_sql.sql, "generated statement");

    let result = match connector.acquire().await {
        Ok(connection) => match policy {
            GeneratedSqlPolicy::ReadOnly => execute_read_only(&generated_sql, connection).await,
            GeneratedSqlPolicy::Unrestricted => execute(&generated_sql, connection).await,
        },
        Err(err) => Err(err),
    };

    Ok(Translated {
        generated_sql,
        result,
    })
}
