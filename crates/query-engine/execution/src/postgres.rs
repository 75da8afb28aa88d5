//! Connections to a PostgreSQL database through sqlx.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Column, Connection as _, Executor as _, Postgres, Row as _, TypeInfo};

use disease_dashboard_configuration::{ConnectionInfo, SslMode};
use query_engine_sql::sql;

use crate::connection::{Access, Connection, Connector};
use crate::error::Error;
use crate::result_set::{ResultSet, Row};

/// Opens a fresh connection for every operation.
#[derive(Clone)]
pub struct PostgresConnector {
    options: PgConnectOptions,
}

impl PostgresConnector {
    pub fn new(connection: &ConnectionInfo) -> Result<Self, Error> {
        let mut options: PgConnectOptions = connection
            .uri
            .parse()
            .map_err(|err: sqlx::Error| Error::Connection(err.to_string()))?;

        if let Some(username) = &connection.username {
            options = options.username(username);
        }
        if let Some(password) = &connection.password {
            options = options.password(password);
        }
        options = options.ssl_mode(match connection.ssl_mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        });
        if let Some(root_certificate) = &connection.ssl_root_certificate {
            options = options.ssl_root_cert(root_certificate);
        }

        Ok(PostgresConnector {
            options: options.application_name("disease-dashboard"),
        })
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn acquire(&self) -> Result<Box<dyn Connection>, Error> {
        let connection = PgConnection::connect_with(&self.options)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Box::new(PostgresConnection { connection }))
    }
}

/// An open session.
pub struct PostgresConnection {
    connection: PgConnection,
}

#[async_trait]
impl Connection for PostgresConnection {
    async fn fetch_all(
        &mut self,
        statement: &sql::string::SQL,
        access: Access,
    ) -> Result<ResultSet, Error> {
        match access {
            Access::ReadWrite => fetch(&mut self.connection, statement).await,
            Access::ReadOnly => {
                let mut transaction = self.connection.begin().await.map_err(statement_error)?;
                sqlx::query("SET TRANSACTION READ ONLY")
                    .execute(&mut *transaction)
                    .await
                    .map_err(statement_error)?;

                let result = fetch(&mut transaction, statement).await;

                if let Err(err) = transaction.rollback().await {
                    tracing::warn!(error = %err, "failed to roll back read-only transaction");
                }
                result
            }
        }
    }

    async fn close(self: Box<Self>) -> Result<(), Error> {
        self.connection
            .close()
            .await
            .map_err(|err| Error::Connection(err.to_string()))
    }
}

fn statement_error(err: sqlx::Error) -> Error {
    Error::Statement(err.to_string())
}

async fn fetch(
    connection: &mut PgConnection,
    statement: &sql::string::SQL,
) -> Result<ResultSet, Error> {
    let query = statement.params.iter().fold(
        sqlx::query(statement.sql.as_str()),
        |query, param| match param {
            sql::string::Param::String(value) => query.bind(value.as_str()),
            sql::string::Param::Integer(value) => query.bind(*value),
        },
    );

    let rows = query
        .fetch_all(&mut *connection)
        .await
        .map_err(statement_error)?;

    let columns = match rows.first() {
        Some(row) => column_names(row.columns()),
        // no row to read the columns from, so ask the server to describe the statement
        None => match (&mut *connection).describe(statement.sql.as_str()).await {
            Ok(description) => column_names(description.columns()),
            Err(err) => {
                tracing::debug!(error = %err, "cannot describe statement, returning no columns");
                vec![]
            }
        },
    };

    Ok(ResultSet::new(columns, rows.iter().map(decode_row).collect()))
}

fn column_names(columns: &[PgColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

fn decode_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .map(|column| decode_cell(row, column.ordinal(), column.type_info().name()))
        .collect()
}

/// Decode a value by its database type. NULLs and values we cannot decode become JSON null.
fn decode_cell(row: &PgRow, index: usize, type_name: &str) -> serde_json::Value {
    match type_name {
        "BOOL" => decode::<bool>(row, index),
        "INT2" => decode::<i16>(row, index),
        "INT4" => decode::<i32>(row, index),
        "INT8" => decode::<i64>(row, index),
        "FLOAT4" => decode::<f32>(row, index),
        "FLOAT8" => decode::<f64>(row, index),
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)
            .ok()
            .flatten()
            .map_or(serde_json::Value::Null, decimal_to_json),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map_or(serde_json::Value::Null, |date| date.to_string().into()),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map_or(serde_json::Value::Null, |timestamp| {
                timestamp.to_string().into()
            }),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .ok()
            .flatten()
            .map_or(serde_json::Value::Null, |timestamp| {
                timestamp.to_rfc3339().into()
            }),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(serde_json::Value::Null),
        _ => {
            let text = row.try_get::<Option<String>, _>(index);
            if text.is_err() {
                tracing::debug!(type_name, index, "cannot decode column, returning null");
            }
            text.ok()
                .flatten()
                .map_or(serde_json::Value::Null, serde_json::Value::String)
        }
    }
}

fn decode<'r, T>(row: &'r PgRow, index: usize) -> serde_json::Value
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + Into<serde_json::Value>,
{
    row.try_get::<Option<T>, _>(index)
        .ok()
        .flatten()
        .map_or(serde_json::Value::Null, Into::into)
}

/// Whole numbers stay integers; everything else becomes a float, or text when out of range.
fn decimal_to_json(value: Decimal) -> serde_json::Value {
    if value.fract().is_zero() {
        if let Some(integer) = value.to_i64() {
            return integer.into();
        }
    }
    value
        .to_f64()
        .map_or_else(|| value.to_string().into(), Into::into)
}
