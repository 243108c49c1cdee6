//! Product endpoints.

use crate::api::{with_session, ApiError};
use crate::AppState;
use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Extension, Json, Query,
};
use std::sync::Arc;
use tillbook_catalog::{create_product, list_products};
use tillbook_types::{NewProduct, Page};

/// POST /products/
///
/// Stores the product and echoes the persisted fields. The assigned id is
/// not part of the response.
pub async fn create_product_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<NewProduct>, ApiError> {
    let Json(payload) = payload?;

    let product = with_session(&state.pool, "create_product", move |conn| {
        create_product(conn, &payload)
    })
    .await?;

    tracing::info!(id = product.id, "product created");
    Ok(Json(NewProduct::from(product)))
}

/// GET /products/?skip=&limit=
pub async fn list_products_handler(
    Extension(state): Extension<Arc<AppState>>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<NewProduct>>, ApiError> {
    let Query(page) = page?;

    let products =
        with_session(&state.pool, "list_products", move |conn| list_products(conn, page)).await?;

    Ok(Json(products.into_iter().map(NewProduct::from).collect()))
}
