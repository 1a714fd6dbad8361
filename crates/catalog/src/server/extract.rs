//! Request extractors that validate product payloads before a handler runs.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use common::protocol::{NewProduct, ProductPatch};
use common::ServiceError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use crate::validate::{validate_product, Mode};

/// A payload type checked by [`validate_product`].
pub trait ProductPayload: DeserializeOwned {
    const MODE: Mode;
}

impl ProductPayload for NewProduct {
    const MODE: Mode = Mode::Full;
}

impl ProductPayload for ProductPatch {
    const MODE: Mode = Mode::Partial;
}

/// JSON body of type `T` that has passed every field rule.
///
/// On any violation the request is rejected with a `ValidationError` carrying
/// the full violation list, and the handler body never runs.
#[derive(Debug)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ProductPayload + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;

        let violations = validate_product(&body, T::MODE);
        if !violations.is_empty() {
            return Err(ServiceError::validation("Product validation failed", violations).into());
        }

        let payload = serde_json::from_value(body).map_err(|e| {
            ServiceError::validation("Product validation failed", vec![e.to_string()])
        })?;
        Ok(Self(payload))
    }
}

/// The `:id` segment of a product route.
///
/// Only the canonical form an issued id is rendered in (lowercase,
/// hyphenated) names a product; every other segment, including ones that are
/// not valid UTF-8 once decoded, resolves to a `NotFoundError`. Extraction
/// never fails, so body validation still runs before the id is resolved.
#[derive(Debug)]
pub struct ProductId {
    raw: String,
    id: Option<Uuid>,
}

impl ProductId {
    fn parse(raw: String) -> Self {
        let id = Uuid::try_parse(&raw)
            .ok()
            .filter(|id| id.hyphenated().to_string() == raw);
        Self { raw, id }
    }

    /// The product id, or a `NotFoundError` when the segment cannot name one.
    pub fn resolve(&self) -> Result<Uuid, ApiError> {
        self.id.ok_or_else(|| self.not_found())
    }

    pub fn not_found(&self) -> ApiError {
        ServiceError::NotFound(format!("Product with ID {} not found", self.raw)).into()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            // Undecodable segment: report it as sent.
            Err(_) => parts
                .uri
                .path()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_owned(),
        };
        Ok(Self::parse(raw))
    }
}
