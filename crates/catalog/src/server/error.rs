//! Mapping from [`ServiceError`] to HTTP responses.
//!
//! Handlers, extractors, and middleware return [`ApiError`]. Its
//! `IntoResponse` impl only sets the status and parks the error in the
//! response extensions; the body is written once, by
//! [`translate_errors`](super::middleware::translate_errors), through
//! [`render`].

use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tracing::{error, warn};

use crate::config::AppEnv;
use crate::store::StoreError;

/// An error escaping a handler, extractor, or middleware.
#[derive(Debug, Clone)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self(ServiceError::NotFound(e.to_string())),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => Self(
                ServiceError::BadRequest("Invalid JSON format in request body".into()),
            ),
            other => Self(ServiceError::Status {
                status: other.status().as_u16(),
                message: other.body_text(),
            }),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ServiceError::Status {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Render `err` as the public JSON error body.
///
/// 500 responses carry the internal error text only in development.
pub fn render(err: &ApiError, app_env: AppEnv) -> Response {
    let e = &err.0;
    if e.is_server_error() {
        error!(error = %e, kind = e.kind(), "request failed");
    } else {
        warn!(error = %e, kind = e.kind(), status = e.http_status(), "request rejected");
    }

    let mut body = ErrorResponse::new(e.kind(), e.public_message());
    if let Some(details) = e.details() {
        body = body.with_details(details.to_vec());
    }
    if e.is_server_error() && app_env.is_development() {
        body = body.with_diagnostic(e.to_string());
    }
    (err.status(), Json(body)).into_response()
}

/// Convert a caught handler panic into a 500.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "panic with non-string payload".to_owned()
    };
    ApiError(ServiceError::Internal(format!("handler panicked: {detail}"))).into_response()
}
