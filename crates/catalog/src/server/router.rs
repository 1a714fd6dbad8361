//! Axum router construction.

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::{error, handlers, middleware as mw, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    with_middleware(routes(), state)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route(
            "/api/products",
            get(handlers::list_products)
                .post(handlers::create_product)
                .fallback(handlers::not_found),
        )
        .route(
            "/api/products/search",
            get(handlers::search_products).fallback(handlers::not_found),
        )
        .route(
            "/api/products/stats",
            get(handlers::product_stats).fallback(handlers::not_found),
        )
        .route(
            "/api/products/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product)
                .fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
}

/// Wrap `routes` in the shared stack.
///
/// Layers run outermost first: access log, error translator, panic catcher,
/// API-key gate.
fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let stack = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(mw::make_request_span)
                .on_request(mw::log_request)
                .on_response(mw::log_response),
        )
        .layer(middleware::from_fn_with_state(state.clone(), mw::translate_errors))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), mw::require_api_key));

    routes.layer(stack).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppEnv;
    use crate::store::ProductStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn state(app_env: AppEnv) -> AppState {
        AppState::new(ProductStore::seeded(), Some("test-key".into()), app_env)
    }

    fn app() -> Router {
        build(state(AppEnv::Production))
    }

    async fn explode() -> &'static str {
        panic!("store invariant broken")
    }

    fn panicking_app(app_env: AppEnv) -> Router {
        with_middleware(Router::new().route("/explode", get(explode)), state(app_env))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "NotFoundError");
        assert_eq!(body["message"], "Route /unknown not found");
    }

    #[tokio::test]
    async fn health_route_is_public() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "OK");
    }

    #[tokio::test]
    async fn root_route_is_public() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["endpoints"]["products"], "/api/products");
    }

    #[tokio::test]
    async fn guarded_route_without_key_returns_401() {
        let req = Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn unknown_api_route_is_gated_before_404() {
        let req = Request::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/api/unknown")
            .header("x-api-key", "test-key")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsupported_method_on_known_path_returns_404() {
        let req = Request::builder()
            .method("PATCH")
            .uri("/api/products")
            .header("x-api-key", "test-key")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "NotFoundError");
    }

    #[tokio::test]
    async fn handler_panic_becomes_generic_500() {
        let req = Request::builder()
            .uri("/explode")
            .body(Body::empty())
            .unwrap();
        let resp = panicking_app(AppEnv::Production).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "InternalServerError");
        assert_eq!(body["message"], "An unexpected error occurred");
        assert!(body.get("diagnostic").is_none());
    }

    #[tokio::test]
    async fn handler_panic_shows_diagnostic_in_development() {
        let req = Request::builder()
            .uri("/explode")
            .body(Body::empty())
            .unwrap();
        let resp = panicking_app(AppEnv::Development).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["diagnostic"]
            .as_str()
            .unwrap()
            .contains("store invariant broken"));
    }
}
