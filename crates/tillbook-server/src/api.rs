//! Shared plumbing for the HTTP handlers: the error type and per-request
//! database sessions.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use rusqlite::Connection;
use tillbook_catalog::CatalogError;
use tillbook_db::DbPool;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or query string could not be decoded. Storage was
    /// not touched.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The database could not be reached or the operation failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Storage(detail) => {
                tracing::error!(error = %detail, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Runs one store operation on a connection checked out for this request.
///
/// The work happens on the blocking pool. The connection goes back to the
/// pool when the closure returns, whether it succeeded or not; nothing
/// holds it past this call.
pub(crate) async fn with_session<T, F>(
    pool: &DbPool,
    operation: &'static str,
    work: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::Storage(format!("{operation}: db connection failed: {e}")))?;
        work(&conn).map_err(|e| ApiError::Storage(format!("{operation}: {e}")))
    })
    .await
    .map_err(|e| ApiError::Storage(format!("{operation}: task join error: {e}")))?
}
