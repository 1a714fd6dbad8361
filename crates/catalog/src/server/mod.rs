//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and the shared middleware stack.
//! - Gate everything under `/api` behind the `x-api-key` header.
//! - Validate product payloads before handlers run.
//! - Translate every escaping error into one JSON error shape.
//! - Inject shared application state (`AppState`) into handlers.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
