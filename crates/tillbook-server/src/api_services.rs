//! Service endpoints.

use crate::api::{with_session, ApiError};
use crate::AppState;
use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Extension, Json, Query,
};
use std::sync::Arc;
use tillbook_catalog::{create_service, list_services};
use tillbook_types::{NewService, Page};

/// POST /services/
pub async fn create_service_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<NewService>, JsonRejection>,
) -> Result<Json<NewService>, ApiError> {
    let Json(payload) = payload?;

    let service = with_session(&state.pool, "create_service", move |conn| {
        create_service(conn, &payload)
    })
    .await?;

    tracing::info!(id = service.id, "service created");
    Ok(Json(NewService::from(service)))
}

/// GET /services/?skip=&limit=
pub async fn list_services_handler(
    Extension(state): Extension<Arc<AppState>>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<NewService>>, ApiError> {
    let Query(page) = page?;

    let services =
        with_session(&state.pool, "list_services", move |conn| list_services(conn, page)).await?;

    Ok(Json(services.into_iter().map(NewService::from).collect()))
}
