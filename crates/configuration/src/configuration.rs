//! Configuration for the service at runtime.

use std::path::PathBuf;
use std::time::Duration;

use query_engine_metadata::metadata::DiseaseTable;

use crate::values::{GeneratedSqlPolicy, SslMode};

/// The 'Configuration' type collects all the information necessary to serve requests at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves every secret against the environment.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub table: DiseaseTable,
    pub connection: ConnectionInfo,
    pub introspection_owner: String,
    pub generation: GenerationConfig,
}

/// Everything needed to open a database connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub uri: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: SslMode,
    pub ssl_root_certificate: Option<PathBuf>,
}

/// Everything needed to ask the completion service for SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f64,
    pub timeout: Duration,
    pub policy: GeneratedSqlPolicy,
}
