use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;

/// Pass/fail gate in front of the aggregate endpoints.
///
/// Token verification proper lives outside this service; the core only
/// consumes an allow/deny decision, here a shared-secret bearer comparison
/// against the configured key. Denial short-circuits before any core logic.
pub async fn require_auth(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        None => unauthorized("Missing Bearer token"),
        Some(token) if token != config.secret_key => unauthorized("Invalid token"),
        Some(_) => next.run(request).await,
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}
