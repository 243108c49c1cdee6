//! Tillbook server library logic.
//!
//! Builds the axum router for the product and service endpoints. The
//! database pool is created by the binary and handed in through
//! [`AppState`]; handlers never reach for a global.

pub mod api;
pub mod api_products;
pub mod api_services;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tillbook_db::DbPool;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Each request checks out its own connection.
    pub pool: DbPool,
}

/// Maximum request body size (64 KiB). Records are a handful of short fields.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Cross-origin policy: any origin, method, and header, with credentials.
///
/// `*` cannot be combined with credentials, so the request's own origin,
/// method, and headers are echoed back instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let products = post(api_products::create_product_handler)
        .get(api_products::list_products_handler);
    let services = post(api_services::create_service_handler)
        .get(api_services::list_services_handler);

    Router::new()
        .route("/health", get(health))
        .route("/products/", products.clone())
        .route("/products", products)
        .route("/services/", services.clone())
        .route("/services", services)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(Extension(Arc::new(state)))
}
