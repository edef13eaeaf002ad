//! Grocery store web application.
//!
//! Exposed as a library so the router can be exercised in tests and by the
//! CLI; the `grocery-web` binary in `main.rs` wires it to a real listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, body::Body, http::Request};
use tower_http::{
    LatencyUnit,
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Directory holding `main.css`, served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary; everything else lives here so
/// tests see the same stack as production.
pub fn build_router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(session_store, state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    DefaultOnResponse::new()
                        .level(tracing::Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        extract::ConnectInfo,
        http::{StatusCode, header},
    };
    use sqlx::PgPool;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::GroceryConfig;
    use crate::middleware::request_id::REQUEST_ID_HEADER;

    /// Router over a pool that never connects; only routes that stop before
    /// the database can be exercised.
    fn app() -> Router {
        let config = GroceryConfig::from_lookup(|key| match key {
            "GROCERY_DATABASE_URL" => Some("postgres://localhost/grocery_test".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPool::connect_lazy("postgres://localhost/grocery_test").unwrap();
        build_router(AppState::new(config, pool), MemoryStore::default())
    }

    fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50_000))));
        request
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(request("GET", "/health", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_auth_pages_render() {
        let response = app()
            .oneshot(request("GET", "/auth/login", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>Log In</h1>"));
        assert!(body.contains("href=\"/auth/signup\""));

        let response = app()
            .oneshot(request("GET", "/auth/signup", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<h1>Sign Up</h1>"));
    }

    #[tokio::test]
    async fn test_login_required_routes_redirect() {
        for (method, uri) in [
            ("GET", "/new_store"),
            ("POST", "/new_store"),
            ("GET", "/new_item"),
            ("GET", "/store/1"),
            ("POST", "/item/1"),
            ("GET", "/shopping_list"),
            ("POST", "/add_to_shopping_list/1"),
            ("POST", "/remove_from_shopping_list/1"),
        ] {
            let response = app().oneshot(request(method, uri, "")).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{method} {uri}");
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "/auth/login",
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_rerenders() {
        let response = app()
            .oneshot(request("POST", "/auth/login", "username=&password="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("This field is required."));
    }

    #[tokio::test]
    async fn test_signup_validation_rerenders_with_username() {
        let response = app()
            .oneshot(request(
                "POST",
                "/auth/signup",
                "username=shopper&password=longenough&password_confirm=different",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Passwords must match."));
        assert!(body.contains("value=\"shopper\""));
        assert!(!body.contains("longenough"));
    }

    #[tokio::test]
    async fn test_static_css_is_served() {
        let response = app()
            .oneshot(request("GET", "/static/main.css", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
