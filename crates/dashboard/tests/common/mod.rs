//! Common functions used across test cases.

use std::collections::HashMap;
use std::sync::Arc;

use disease_dashboard::{routes, state};
use disease_dashboard_configuration::connection_settings::{
    DEFAULT_CONNECTION_URI_VARIABLE, DEFAULT_PASSWORD_VARIABLE, DEFAULT_USERNAME_VARIABLE,
};
use disease_dashboard_configuration::version1::DEFAULT_API_KEY_VARIABLE;
use disease_dashboard_configuration::{make_runtime_configuration, parse_configuration};
use tests_common::deployment::get_path_from_project_root;
use tests_common::fakes::{FakeCompletion, FakeConnector};

pub const DASHBOARD_CONFIGURATION_PATH: &str = "static/dashboard";

/// Creates a router from the test configuration, backed by fakes.
pub async fn create_router(connector: FakeConnector, completion: FakeCompletion) -> axum::Router {
    tests_common::requests::init_logging();

    let environment = HashMap::from([
        (
            DEFAULT_CONNECTION_URI_VARIABLE.into(),
            "postgresql://dashboard@localhost:5432/salud".to_string(),
        ),
        (DEFAULT_USERNAME_VARIABLE.into(), "lector".to_string()),
        (DEFAULT_PASSWORD_VARIABLE.into(), "secreto".to_string()),
        (DEFAULT_API_KEY_VARIABLE.into(), "sk-test".to_string()),
    ]);

    let parsed_configuration =
        parse_configuration(get_path_from_project_root(DASHBOARD_CONFIGURATION_PATH))
            .await
            .unwrap();
    let configuration = make_runtime_configuration(parsed_configuration, environment).unwrap();

    let state = state::create_state_with(configuration, Arc::new(connector), Arc::new(completion))
        .await
        .unwrap();

    routes::create_router(Arc::new(state))
}
