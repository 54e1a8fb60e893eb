use crate::app::database_service::DatabaseService;
use crate::domain::model::SchemaError;
use crate::storage::StoreError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::StatusCode;
use axum::Json;

pub type HandlerError = (StatusCode, Json<ApiResponse>);

pub const DATABASE_NOT_CONFIGURED: &str = "Database not configured";

/// The configured database, or the 500 every data endpoint answers without one.
pub fn require_db(state: &AppState) -> Result<&DatabaseService, HandlerError> {
    state.db_service.as_ref().ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(DATABASE_NOT_CONFIGURED)),
        )
    })
}

pub fn store_error(context: &str, err: StoreError) -> HandlerError {
    tracing::error!(error = %err, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(format!("{}: {}", context, err))),
    )
}

pub fn schema_error(err: SchemaError) -> HandlerError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::field_error(
            err.field_name(),
            err.reason(),
            format!("Validation failed: {}", err),
        )),
    )
}

/// Cuts `s` to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
