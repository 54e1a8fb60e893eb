use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/schema",
    responses(
        (status = 200, description = "Record schema of every collection, keyed by collection name")
    )
)]
pub async fn schema_handler(State(state): State<AppState>) -> Json<JsonValue> {
    Json(state.schema_registry.to_json())
}
