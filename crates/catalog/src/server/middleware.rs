//! Axum middleware applied to the router.
//!
//! Includes the access-log hooks for `TraceLayer`, the API-key gate, and the
//! error translator.

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::USER_AGENT, HeaderMap, Response},
    middleware::Next,
    response::IntoResponse,
};
use common::ServiceError;
use tracing::{info, info_span, Span};

use super::error::{render, ApiError};
use super::state::AppState;

/// Path prefix whose routes require an API key.
pub const API_PREFIX: &str = "/api";

/// Request header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

// ---------------------------------------------------------------------------
// Access log
// ---------------------------------------------------------------------------

/// Open the per-request span; every later event for the request is nested in it.
pub fn make_request_span(req: &Request<Body>) -> Span {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("Unknown");

    info_span!(
        "request",
        method = %req.method(),
        path = %req.uri(),
        user_agent = %user_agent,
        received_at = %chrono::Utc::now().to_rfc3339(),
    )
}

pub fn log_request(_req: &Request<Body>, _span: &Span) {
    info!("request received");
}

/// Fires once the response head is ready to go out, on both success and error paths.
pub fn log_response(res: &Response<Body>, latency: Duration, _span: &Span) {
    info!(
        status = res.status().as_u16(),
        latency_ms = latency.as_millis() as u64,
        "response sent"
    );
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Reject guarded requests whose `x-api-key` header is missing or wrong.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if is_guarded(req.uri().path()) {
        check_api_key(req.headers(), state.api_key.as_deref())?;
    }
    Ok(next.run(req).await)
}

/// Paths under [`API_PREFIX`] are guarded, except the prefix root itself.
fn is_guarded(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.starts_with('/') && rest != "/")
}

fn check_api_key(headers: &HeaderMap, expected: Option<&str>) -> Result<(), ServiceError> {
    let provided = headers.get(API_KEY_HEADER).ok_or_else(|| {
        ServiceError::Unauthorized("API key is required. Please provide x-api-key header.".into())
    })?;

    match expected {
        Some(secret) if provided.as_bytes() == secret.as_bytes() => Ok(()),
        _ => Err(ServiceError::Unauthorized("Invalid API key provided.".into())),
    }
}

// ---------------------------------------------------------------------------
// Error translation
// ---------------------------------------------------------------------------

/// Write the JSON body for any [`ApiError`] produced further down the stack.
pub async fn translate_errors(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let mut response = next.run(req).await;
    match response.extensions_mut().remove::<ApiError>() {
        Some(err) => render(&err, state.app_env),
        None => response,
    }
}
