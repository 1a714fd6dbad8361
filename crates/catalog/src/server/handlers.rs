//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use common::protocol::{
    Endpoints, HealthResponse, NewProduct, Pagination, Product, ProductList, ProductMessage,
    ProductPatch, ProductStats, SearchResults, ServiceInfo,
};
use common::ServiceError;
use serde::Deserialize;
use tracing::info;

use super::error::ApiError;
use super::extract::{ProductId, Validated};
use super::state::AppState;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// `GET /`: service metadata. Not guarded.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Welcome to the Products API!".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        endpoints: Endpoints {
            products: "/api/products".into(),
            search: "/api/products/search?name=term".into(),
            stats: "/api/products/stats".into(),
        },
        documentation: "See README.md for full API documentation".into(),
    })
}

/// `GET /health`: liveness check. Not guarded.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Query string for `GET /api/products`.
///
/// `page` and `limit` are kept as raw strings so a bad value produces a
/// validation error rather than a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query string for `GET /api/products/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

/// `GET /api/products`: filtered, paginated listing.
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ProductList>, ApiError> {
    let Query(params) = query?;
    let (page, limit) = parse_paging(&params)?;
    let category = params.category.as_deref().filter(|c| !c.is_empty());

    let filtered = state.store.list(category).await;
    Ok(Json(paginate(filtered, page, limit)))
}

/// `GET /api/products/search?name=`: case-insensitive name search.
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Query(params) = query?;
    let term = params.name.filter(|n| !n.is_empty()).ok_or_else(|| {
        ServiceError::validation("Search term is required. Use ?name=searchTerm", vec![])
    })?;

    let data = state.store.search(&term).await;
    Ok(Json(SearchResults {
        count: data.len(),
        data,
        search_term: term,
    }))
}

/// `GET /api/products/stats`: aggregate counts and mean price.
pub async fn product_stats(State(state): State<AppState>) -> Json<ProductStats> {
    Json(state.store.stats().await)
}

/// `GET /api/products/:id`
pub async fn get_product(
    State(state): State<AppState>,
    id: ProductId,
) -> Result<Json<Product>, ApiError> {
    let product_id = id.resolve()?;
    state
        .store
        .find_by_id(product_id)
        .await
        .map(Json)
        .ok_or_else(|| id.not_found())
}

/// `POST /api/products`: create from a fully validated payload.
pub async fn create_product(
    State(state): State<AppState>,
    Validated(fields): Validated<NewProduct>,
) -> (StatusCode, Json<ProductMessage>) {
    let product = state.store.create(fields).await;
    info!(product_id = %product.id, "product created");
    (
        StatusCode::CREATED,
        Json(ProductMessage::new("Product created successfully", product)),
    )
}

/// `PUT /api/products/:id`: merge the fields present in the body.
pub async fn update_product(
    State(state): State<AppState>,
    id: ProductId,
    Validated(patch): Validated<ProductPatch>,
) -> Result<Json<ProductMessage>, ApiError> {
    let product_id = id.resolve()?;
    let product = state.store.update_by_id(product_id, patch).await?;
    info!(product_id = %product.id, "product updated");
    Ok(Json(ProductMessage::new("Product updated successfully", product)))
}

/// `DELETE /api/products/:id`
pub async fn delete_product(
    State(state): State<AppState>,
    id: ProductId,
) -> Result<Json<ProductMessage>, ApiError> {
    let product_id = id.resolve()?;
    let product = state.store.delete_by_id(product_id).await?;
    info!(product_id = %product.id, "product deleted");
    Ok(Json(ProductMessage::new("Product deleted successfully", product)))
}

/// Catch-all 404 handler, also used for unsupported methods on known paths.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ServiceError::NotFound(format!("Route {uri} not found")).into()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_paging(params: &ListParams) -> Result<(usize, usize), ApiError> {
    let mut violations = Vec::new();
    let page = parse_positive(params.page.as_deref(), "page", DEFAULT_PAGE, &mut violations);
    let limit = parse_positive(params.limit.as_deref(), "limit", DEFAULT_LIMIT, &mut violations);
    if !violations.is_empty() {
        return Err(ServiceError::validation("Invalid pagination parameters", violations).into());
    }
    Ok((page, limit))
}

fn parse_positive(raw: Option<&str>, name: &str, default: usize, violations: &mut Vec<String>) -> usize {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => {
                violations.push(format!("{name} must be a positive integer"));
                default
            }
        },
    }
}

/// Slice out one page of `items`. `page` and `limit` are both at least 1.
fn paginate(items: Vec<Product>, page: usize, limit: usize) -> ProductList {
    let total = items.len();
    let start = (page - 1).saturating_mul(limit);
    let end = start.saturating_add(limit);

    let data: Vec<Product> = items.into_iter().skip(start).take(limit).collect();

    ProductList {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
            has_next: end < total,
            has_prev: page > 1,
        },
    }
}
