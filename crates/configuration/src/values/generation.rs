use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Secret;

/// The key used to authenticate against the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ApiKey(pub Secret);

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

/// Which statements produced by the language model we are willing to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum GeneratedSqlPolicy {
    /// A single `SELECT` or `WITH` statement that does not modify data.
    #[default]
    ReadOnly,
    /// Anything the model returns.
    Unrestricted,
}
