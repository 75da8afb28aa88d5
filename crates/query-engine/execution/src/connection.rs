//! The seam between the engine and the database driver.

use async_trait::async_trait;

use query_engine_sql::sql;

use crate::error::Error;
use crate::result_set::ResultSet;

/// Whether a statement is allowed to change the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Run inside a read-only transaction that is rolled back afterwards.
    ReadOnly,
}

/// A single open database session. It is used by one operation and then closed.
#[async_trait]
pub trait Connection: Send {
    /// Run a statement, binding its parameters in placeholder order, and fetch every row.
    async fn fetch_all(
        &mut self,
        statement: &sql::string::SQL,
        access: Access,
    ) -> Result<ResultSet, Error>;

    /// End the session.
    async fn close(self: Box<Self>) -> Result<(), Error>;
}

/// Opens database sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn Connection>, Error>;
}
