//! Convert a parsed configuration into the runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::configuration::{Configuration, ConnectionInfo, GenerationConfig};
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::{ApiKey, ConnectionUri, DatabasePassword, DatabaseUsername, Secret};
use crate::version1::ParsedConfiguration;

/// Convert the parsed configuration metadata to internal engine metadata
/// That can be used by the connector at runtime.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let settings = parsed_config.connection_settings;

    let ConnectionUri(uri) = &settings.connection_uri;
    let uri = resolve(uri, "connectionSettings.connectionUri", &environment)?;

    let username = settings
        .username
        .as_ref()
        .map(|DatabaseUsername(secret)| {
            resolve(secret, "connectionSettings.username", &environment)
        })
        .transpose()?;

    let password = settings
        .password
        .as_ref()
        .map(|DatabasePassword(secret)| {
            resolve(secret, "connectionSettings.password", &environment)
        })
        .transpose()?;

    let ssl_root_certificate = settings
        .ssl
        .root_certificate
        .as_ref()
        .map(|secret| {
            resolve(secret, "connectionSettings.ssl.rootCertificate", &environment)
                .map(PathBuf::from)
        })
        .transpose()?;

    let generation = parsed_config.generation;
    let ApiKey(api_key) = &generation.api_key;
    let api_key = resolve(api_key, "generation.apiKey", &environment)?;

    Ok(Configuration {
        table: parsed_config.table,
        connection: ConnectionInfo {
            uri,
            username,
            password,
            ssl_mode: settings.ssl.mode,
            ssl_root_certificate,
        },
        introspection_owner: parsed_config.introspection.owner,
        generation: GenerationConfig {
            endpoint: generation.endpoint,
            model: generation.model,
            api_key,
            temperature: generation.temperature,
            timeout: Duration::from_secs(generation.timeout),
            policy: generation.policy,
        },
    })
}

fn resolve(
    secret: &Secret,
    field: &str,
    environment: &impl Environment,
) -> Result<String, MakeRuntimeConfigurationError> {
    match secret {
        Secret::Plain(value) => Ok(value.clone()),
        Secret::FromEnvironment { variable } => environment.read(variable).map_err(|error| {
            MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                field: field.to_string(),
                message: error.to_string(),
            }
        }),
    }
}
