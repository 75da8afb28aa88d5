//! The first (and current) version of the configuration format.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_metadata::metadata::DiseaseTable;

use crate::connection_settings::DatabaseConnectionSettings;
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};
use crate::values::{ApiKey, ConnectionUri, GeneratedSqlPolicy, Secret};

const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";
pub const DEFAULT_API_KEY_VARIABLE: &str = "DASHBOARD_LLM_API_KEY";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_COMPLETION_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_INTROSPECTION_OWNER: &str = "public";

/// Initial configuration, just enough to connect to a database and the completion service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    // Which version of the configuration format are we using
    pub version: u32,
    pub connection_settings: DatabaseConnectionSettings,
    /// The disease records table and the columns the filters apply to.
    #[serde(default)]
    pub table: DiseaseTable,
    #[serde(default)]
    pub introspection: IntrospectionOptions,
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// Options for describing the database to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionOptions {
    /// The schema (owner) whose tables are described. Matched case-insensitively.
    #[serde(default = "introspection_owner_default")]
    pub owner: String,
}

impl Default for IntrospectionOptions {
    fn default() -> Self {
        IntrospectionOptions {
            owner: introspection_owner_default(),
        }
    }
}

/// Settings for the OpenAI-compatible completion service that writes SQL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "endpoint_default")]
    pub endpoint: String,
    #[serde(default = "model_default")]
    pub model: String,
    #[serde(default = "api_key_default")]
    pub api_key: ApiKey,
    #[serde(default)]
    pub temperature: f64,
    /// How long to wait for a completion before giving up (seconds).
    #[serde(default = "timeout_default")]
    #[schemars(range(min = 1))]
    pub timeout: u64,
    #[serde(default)]
    pub policy: GeneratedSqlPolicy,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            endpoint: endpoint_default(),
            model: model_default(),
            api_key: api_key_default(),
            temperature: 0.0,
            timeout: timeout_default(),
            policy: GeneratedSqlPolicy::default(),
        }
    }
}

// for serde default //
fn introspection_owner_default() -> String {
    DEFAULT_INTROSPECTION_OWNER.to_string()
}
fn endpoint_default() -> String {
    DEFAULT_COMPLETION_ENDPOINT.to_string()
}
fn model_default() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}
fn api_key_default() -> ApiKey {
    ApiKey(Secret::from_environment(DEFAULT_API_KEY_VARIABLE))
}
fn timeout_default() -> u64 {
    DEFAULT_COMPLETION_TIMEOUT_SECONDS
}

impl ParsedConfiguration {
    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }

    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            connection_settings: DatabaseConnectionSettings::empty(),
            table: DiseaseTable::default(),
            introspection: IntrospectionOptions::default(),
            generation: GenerationSettings::default(),
        }
    }
}

/// Parse the configuration format from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    if parsed_config.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion {
            file_path: configuration_file,
            version: parsed_config.version,
        });
    }

    if let ConnectionUri(Secret::Plain(uri)) = &parsed_config.connection_settings.connection_uri {
        if uri.trim().is_empty() {
            return Err(ParseConfigurationError::EmptyConnectionUri {
                file_path: configuration_file,
            });
        }
    }

    if parsed_config.generation.timeout == 0 {
        return Err(ParseConfigurationError::ZeroCompletionTimeout {
            file_path: configuration_file,
        });
    }

    tracing::debug!(path = %configuration_file.display(), "parsed configuration");

    Ok(parsed_config)
}

/// Write the parsed configuration into a directory on disk.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    Ok(())
}
