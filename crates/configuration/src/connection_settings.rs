//! Database connection settings.

use crate::values::{ConnectionUri, DatabasePassword, DatabaseUsername, Secret, SslMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "DB_DSN";
pub const DEFAULT_USERNAME_VARIABLE: &str = "DB_USERNAME";
pub const DEFAULT_PASSWORD_VARIABLE: &str = "DB_PASSWORD";

/// Database connection settings.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnectionSettings {
    /// Connection string for a Postgres-compatible database.
    pub connection_uri: ConnectionUri,
    /// User to connect as, overriding the one in the connection string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<DatabaseUsername>,
    /// Password to connect with, overriding the one in the connection string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<DatabasePassword>,
    #[serde(default, skip_serializing_if = "SslSettings::is_default")]
    pub ssl: SslSettings,
}

/// Secure transport settings.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SslSettings {
    #[serde(default)]
    pub mode: SslMode,
    /// Path to a PEM file with the certificate authority to trust.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_certificate: Option<Secret>,
}

impl SslSettings {
    fn is_default(&self) -> bool {
        *self == SslSettings::default()
    }
}

impl DatabaseConnectionSettings {
    pub fn empty() -> Self {
        Self {
            connection_uri: ConnectionUri(Secret::from_environment(
                DEFAULT_CONNECTION_URI_VARIABLE,
            )),
            username: Some(DatabaseUsername(Secret::from_environment(
                DEFAULT_USERNAME_VARIABLE,
            ))),
            password: Some(DatabasePassword(Secret::from_environment(
                DEFAULT_PASSWORD_VARIABLE,
            ))),
            ssl: SslSettings::default(),
        }
    }
}
