//! Describe the tables of a database schema.

use tracing::{info_span, Instrument};

use query_engine_metadata::metadata::SchemaMap;
use query_engine_sql::sql;

use crate::connection::Connection;
use crate::execution::execute;

/// Read the tables and columns visible under `owner` from the catalog.
///
/// The owner is matched case-insensitively. Tables keep catalog order and columns keep their
/// declaration order. A failed catalog query is logged and produces an empty map.
pub async fn introspect_schema(owner: &str, connection: Box<dyn Connection>) -> SchemaMap {
    let statement = catalog_statement(owner);

    let result = execute(&statement, connection)
        .instrument(info_span!("Introspect schema", owner))
        .await;

    match result {
        Ok(result_set) => {
            let (Some(table_index), Some(column_index)) = (
                result_set.column_index("table_name"),
                result_set.column_index("column_name"),
            ) else {
                tracing::warn!(owner, "unexpected catalog columns, using an empty schema");
                return SchemaMap::empty();
            };
            let schema = SchemaMap::from_rows(result_set.rows.iter().filter_map(|row| {
                let table = row.get(table_index)?.as_str()?;
                let column = row.get(column_index)?.as_str()?;
                Some((table, column))
            }));
            tracing::info!(
                owner,
                tables = schema.tables().count(),
                "introspected schema"
            );
            schema
        }
        Err(err) => {
            tracing::warn!(owner, error = %err, "introspection failed, using an empty schema");
            SchemaMap::empty()
        }
    }
}

/// The catalog query listing every column of every table under an owner.
pub fn catalog_statement(owner: &str) -> sql::string::SQL {
    let mut statement = sql::string::SQL::new();
    statement.append_syntax(
        "SELECT table_name::text AS table_name, column_name::text AS column_name \
         FROM information_schema.columns WHERE UPPER(table_schema) = UPPER(",
    );
    statement.append_param(sql::string::Param::String(owner.to_string()));
    statement.append_syntax(") ORDER BY table_name, ordinal_position");
    statement
}
