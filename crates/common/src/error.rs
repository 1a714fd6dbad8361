//! Common error types shared across crates.

use thiserror::Error;

/// Public message returned for every 500; the real cause stays in the logs.
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Validation`] → 400, with a list of violations
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthorized`] → 401
/// - [`ServiceError::Status`] → whatever status the framework reported
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// An id-keyed lookup or a route match missed.
    #[error("{0}")]
    NotFound(String),

    /// A payload failed one or more field rules.
    #[error("{message}")]
    Validation {
        message: String,
        /// Every violated rule, in field order.
        details: Vec<String>,
    },

    /// The request body could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// The API key was missing or did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// A rejection carrying its own recognizable status code.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Anything else. The string is diagnostic detail, never shown in production.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a [`ServiceError::Validation`].
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            details,
        }
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Validation { .. } => 400,
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Status { status, .. } => *status,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Kind name placed in the `error` field of the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NotFoundError",
            ServiceError::Validation { .. } => "ValidationError",
            ServiceError::BadRequest(_) => "BadRequest",
            ServiceError::Unauthorized(_) => "Unauthorized",
            ServiceError::Status { status, .. } => status_kind(*status),
            ServiceError::Internal(_) => "InternalServerError",
        }
    }

    /// Message safe to expose to callers.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Internal(_) => INTERNAL_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }

    /// Violation list, present only for validation failures.
    pub fn details(&self) -> Option<&[String]> {
        match self {
            ServiceError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Returns `true` for errors that indicate a fault on our side.
    pub fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }
}

fn status_kind(status: u16) -> &'static str {
    match status {
        400 => "BadRequest",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "NotFoundError",
        405 => "MethodNotAllowed",
        413 => "PayloadTooLarge",
        415 => "UnsupportedMediaType",
        422 => "UnprocessableEntity",
        s if s >= 500 => "InternalServerError",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::validation("x", vec![]).http_status(), 400);
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::Unauthorized("x".into()).http_status(), 401);
        assert_eq!(
            ServiceError::Status {
                status: 415,
                message: "x".into()
            }
            .http_status(),
            415
        );
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ServiceError::NotFound("x".into()).kind(), "NotFoundError");
        assert_eq!(ServiceError::validation("x", vec![]).kind(), "ValidationError");
        assert_eq!(
            ServiceError::Status {
                status: 415,
                message: "x".into()
            }
            .kind(),
            "UnsupportedMediaType"
        );
        assert_eq!(
            ServiceError::Status {
                status: 418,
                message: "x".into()
            }
            .kind(),
            "Error"
        );
    }

    #[test]
    fn internal_message_is_generic() {
        let e = ServiceError::Internal("lock poisoned at store.rs:42".into());
        assert_eq!(e.public_message(), INTERNAL_MESSAGE);
        assert!(e.to_string().contains("store.rs:42"));
        assert!(e.is_server_error());
    }

    #[test]
    fn details_only_for_validation() {
        let e = ServiceError::validation("Product validation failed", vec!["bad name".into()]);
        assert_eq!(e.details(), Some(&["bad name".to_owned()][..]));
        assert!(ServiceError::NotFound("gone".into()).details().is_none());
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::NotFound("Product with ID abc not found".into());
        assert_eq!(e.public_message(), "Product with ID abc not found");
    }
}
