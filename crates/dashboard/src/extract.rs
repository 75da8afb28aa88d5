//! Request extractors whose failures still answer with a [`DashboardResponse`].

use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::FromRequest;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};

use query_engine_translation::translation::filters::RawFilters;

use crate::response::DashboardResponse;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Filters sent either as a JSON object or as an urlencoded form.
///
/// An empty body means no filters. Repeated form fields make up the list filters.
pub struct Filters(pub RawFilters);

#[async_trait]
impl<S> FromRequest<S, Body> for Filters
where
    S: Send + Sync,
{
    type Rejection = Rejected;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|err| Rejected::new(err.body_text()))?;
            return Ok(Filters(RawFilters::from_form_pairs(pairs)));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|err| Rejected::new(err.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Filters(RawFilters::default()));
        }
        serde_json::from_slice(&body)
            .map(Filters)
            .map_err(|err| Rejected::new(format!("invalid filters: {err}")))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with(FORM_CONTENT_TYPE))
}

/// A request the dashboard could not read. Answered with `400 Bad Request`.
#[derive(Debug)]
pub struct Rejected(DashboardResponse);

impl Rejected {
    pub fn new(message: impl Into<String>) -> Self {
        Rejected(DashboardResponse::rejected(message))
    }

    /// Questions always report a generated statement, even an empty one.
    #[must_use]
    pub fn for_question(self) -> Self {
        Rejected(self.0.with_generated_sql(""))
    }
}

impl IntoResponse for Rejected {
    fn into_response(self) -> Response {
        tracing::warn!(error = ?self.0.error, "rejected request");
        (StatusCode::BAD_REQUEST, Json(self.0)).into_response()
    }
}
