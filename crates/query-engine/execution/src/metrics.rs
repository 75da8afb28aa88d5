//! Metrics setup and update for the dashboard.

use prometheus::core::{AtomicU64, GenericCounter};

/// The collection of all metrics exposed through the `/metrics` endpoint.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub query_error_total: GenericCounter<AtomicU64>,
    pub translation_total: GenericCounter<AtomicU64>,
    pub translation_error_total: GenericCounter<AtomicU64>,
}

impl Metrics {
    /// Set up counters used to produce Prometheus metrics.
    pub fn initialize(
        metrics_registry: &mut prometheus::Registry,
    ) -> Result<Self, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "disease_dashboard_query_total",
            "Total successful queries.",
        )?;

        let query_error_total = add_int_counter_metric(
            metrics_registry,
            "disease_dashboard_query_error_total",
            "Total queries that failed to connect or run.",
        )?;

        let translation_total = add_int_counter_metric(
            metrics_registry,
            "disease_dashboard_translation_total",
            "Total questions successfully translated to SQL.",
        )?;

        let translation_error_total = add_int_counter_metric(
            metrics_registry,
            "disease_dashboard_translation_error_total",
            "Total questions that could not be translated to SQL.",
        )?;

        Ok(Self {
            query_total,
            query_error_total,
            translation_total,
            translation_error_total,
        })
    }

    /// Count the outcome of running a statement.
    pub fn record_query<T, E>(&self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.query_total.inc(),
            Err(_) => self.query_error_total.inc(),
        }
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, prometheus::Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}
