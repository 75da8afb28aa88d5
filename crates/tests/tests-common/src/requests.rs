//! Send requests to a router and read back JSON.

use axum::http::StatusCode;
use axum_test_helper::TestClient;

/// Install a test-friendly log subscriber once per test binary.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// POST a JSON body and return the status and the decoded response.
pub async fn post_json(
    router: axum::Router,
    path: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_body(router, path, "application/json", body.to_string()).await
}

/// POST an urlencoded form and return the status and the decoded response.
///
/// Names and values are sent as given, so they must already be urlencoded.
pub async fn post_form(
    router: axum::Router,
    path: &str,
    fields: &[(&str, &str)],
) -> (StatusCode, serde_json::Value) {
    let body = fields
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    post_body(router, path, "application/x-www-form-urlencoded", body).await
}

/// POST a body as is and return the status and the decoded response.
pub async fn post_body(
    router: axum::Router,
    path: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let client = TestClient::new(router);
    let response = client
        .post(path)
        .body(body)
        .header("Content-Type", content_type)
        .send()
        .await;
    let status = response.status();
    (status, response.json().await)
}

/// GET a path and return the status and the body as text.
pub async fn get_text(router: axum::Router, path: &str) -> (StatusCode, String) {
    let client = TestClient::new(router);
    let response = client.get(path).send().await;
    let status = response.status();
    (status, response.text().await)
}

/// GET a path and return the status and the decoded response.
pub async fn get_json(router: axum::Router, path: &str) -> (StatusCode, serde_json::Value) {
    let (status, text) = get_text(router, path).await;
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
    (status, body)
}
