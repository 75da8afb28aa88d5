//! Errors for query execution and natural-language translation.

use query_engine_translation::translation;

/// Everything that can go wrong between receiving a statement and returning its rows.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not connect to the database: {0}")]
    Connection(String),
    #[error("the database could not run the statement: {0}")]
    Statement(String),
    #[error("could not generate a statement: {0}")]
    Translation(#[from] translation::error::Error),
    #[error("the completion service failed: {0}")]
    Completion(String),
}

impl Error {
    /// Whether the failure happened before any statement reached the database.
    pub fn is_translation_failure(&self) -> bool {
        matches!(self, Error::Translation(_) | Error::Completion(_))
    }
}
