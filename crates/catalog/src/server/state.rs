//! Shared application state injected into every Axum handler.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppEnv;
use crate::store::ProductStore;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// The product collection.
    pub store: ProductStore,
    /// Expected `x-api-key` value; `None` rejects every guarded request.
    pub api_key: Option<Arc<str>>,
    /// Controls whether 500 responses include diagnostic detail.
    pub app_env: AppEnv,
    /// Process start, for the uptime reported by `/health`.
    pub started_at: Instant,
}

impl AppState {
    /// Create a new [`AppState`] around `store`.
    pub fn new(store: ProductStore, api_key: Option<String>, app_env: AppEnv) -> Self {
        Self {
            store,
            api_key: api_key.map(Arc::from),
            app_env,
            started_at: Instant::now(),
        }
    }
}
