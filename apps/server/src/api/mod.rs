//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::{state::AppState, Error};
use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// The router wrapped so that `/v1/products/` and `/v1/products` are the same route.
pub type App = NormalizePath<Router>;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    let api_router = routes::products::product_routes().layer(
        axum::middleware::from_fn_with_state(state.clone(), crate::auth::auth_middleware),
    );

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // HTML search form
        .route("/", get(handlers::index_page))
        // Favicon handler (returns 204 to prevent 404 logs)
        .route("/favicon.ico", get(favicon))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_handler))
        // Product API
        .nest("/v1", api_router)
        .fallback(not_found)
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(middleware::trace())
        .layer(DefaultBodyLimit::max(max_body_size))
}

/// Router plus trailing-slash normalization. Path normalization has to run
/// before routing, so it wraps the router instead of being one of its layers.
pub fn create_app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-gateway"
    }))
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn not_found(uri: Uri) -> Response {
    Error::NotFound(uri.path().to_string()).into_response()
}
