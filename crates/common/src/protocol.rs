//! Request and response types exchanged over the public HTTP API.
//!
//! All bodies are JSON with camelCase field names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A stored product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the server on create, never changed afterwards.
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// Request body for `POST /api/products`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// Request body for `PUT /api/products/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

// ---------------------------------------------------------------------------
// Product responses
// ---------------------------------------------------------------------------

/// Page metadata attached to list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    /// Number of products after filtering, before paging.
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Response body for `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

/// Response body for `GET /api/products/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub data: Vec<Product>,
    pub count: usize,
    pub search_term: String,
}

/// Response body for `GET /api/products/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: usize,
    pub in_stock_count: usize,
    pub out_of_stock_count: usize,
    /// Product count per category.
    pub category_stats: BTreeMap<String, usize>,
    /// `None` when the store is empty.
    pub average_price: Option<f64>,
}

/// Response body for the create, update, and delete routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMessage {
    pub message: String,
    pub product: Product,
}

impl ProductMessage {
    pub fn new(message: impl Into<String>, product: Product) -> Self {
        Self {
            message: message.into(),
            product,
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind name (e.g. `"ValidationError"`).
    pub error: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Individual rule violations, for validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Internal error text, only populated in development.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a kind name and message.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            diagnostic: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"OK"` while the process is serving.
    pub status: String,
    /// RFC 3339 UTC time the response was produced.
    pub timestamp: String,
    /// Seconds since the service started.
    pub uptime: f64,
}

/// Paths advertised by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub products: String,
    pub search: String,
    pub stats: String,
}

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
    pub documentation: String,
}
