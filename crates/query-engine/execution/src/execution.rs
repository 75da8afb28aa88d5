//! Execute a statement against the database.

use tracing::{info_span, Instrument};

use query_engine_sql::sql;

use crate::connection::{Access, Connection};
use crate::error::Error;
use crate::result_set::ResultSet;

/// Run a statement on a connection and fetch every row.
///
/// The connection is closed before returning, whether the statement succeeded or not. A
/// failure to close is logged and does not change the outcome.
pub async fn execute(
    statement: &sql::string::SQL,
    connection: Box<dyn Connection>,
) -> Result<ResultSet, Error> {
    execute_with_access(statement, Access::ReadWrite, connection).await
}

/// Like [`execute`], but the statement cannot change the database.
pub async fn execute_read_only(
    statement: &sql::string::SQL,
    connection: Box<dyn Connection>,
) -> Result<ResultSet, Error> {
    execute_with_access(statement, Access::ReadOnly, connection).await
}

async fn execute_with_access(
    statement: &sql::string::SQL,
    access: Access,
    mut connection: Box<dyn Connection>,
) -> Result<ResultSet, Error> {
    tracing::debug!(
        sql = %statement.sql,
        params = ?&statement.params,
        ?access,
        "executing statement"
    );

    let result = connection
        .fetch_all(statement, access)
        .instrument(info_span!("Execute statement"))
        .await;

    if let Err(err) = connection.close().await {
        tracing::warn!(error = %err, "failed to close connection");
    }

    match &result {
        Ok(result_set) => tracing::debug!(rows = result_set.len(), "statement returned"),
        Err(err) => tracing::error!(
            meta.signal_type = "log",
            event.domain = "dashboard",
            event.name = "Statement error",
            name = "Statement error",
            body = %err,
            error = true,
        ),
    }

    result
}
