//! Transient state used by the dashboard.
//!
//! This is initialized on startup.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use disease_dashboard_configuration::Configuration;
use query_engine_execution::completion::{ChatCompletionClient, CompletionService};
use query_engine_execution::connection::Connector;
use query_engine_execution::metrics;
use query_engine_execution::postgres::PostgresConnector;

/// State shared by every request.
#[derive(Clone)]
pub struct State {
    pub configuration: Configuration,
    pub connector: Arc<dyn Connector>,
    pub completion: Arc<dyn CompletionService>,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
}

/// Create the database connector and the completion client from the configuration and wrap
/// them inside a State.
pub async fn create_state(configuration: Configuration) -> Result<State, InitializationError> {
    let connector =
        PostgresConnector::new(&configuration.connection).map_err(InitializationError::Connector)?;
    let completion = ChatCompletionClient::new(&configuration.generation)
        .map_err(InitializationError::Completion)?;

    create_state_with(configuration, Arc::new(connector), Arc::new(completion)).await
}

/// Wrap an existing connector and completion service inside a State.
pub async fn create_state_with(
    configuration: Configuration,
    connector: Arc<dyn Connector>,
    completion: Arc<dyn CompletionService>,
) -> Result<State, InitializationError> {
    let mut metrics_registry = prometheus::Registry::new();
    let metrics = async {
        let metrics_inner = metrics::Metrics::initialize(&mut metrics_registry)
            .map_err(InitializationError::MetricsError)?;
        Ok::<_, InitializationError>(metrics_inner)
    }
    .instrument(info_span!("Setup metrics"))
    .await?;

    Ok(State {
        configuration,
        connector,
        completion,
        metrics,
        metrics_registry,
    })
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to configure the database connection: {0}")]
    Connector(query_engine_execution::Error),
    #[error("unable to create the completion client: {0}")]
    Completion(query_engine_execution::Error),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
