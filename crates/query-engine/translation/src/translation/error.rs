//! Errors for translation.

/// A statement produced by the language model that we refuse to run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the language model did not return a statement")]
    EmptyStatement,
    #[error("the generated text contains more than one statement")]
    MultipleStatements,
    #[error("only read-only statements may be generated, found '{0}'")]
    NotReadOnly(String),
}
