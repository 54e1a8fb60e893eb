use crate::domain::model::{CollectionModel, Gift};
use crate::transport::http::handlers::common::{require_db, schema_error, store_error, HandlerError};
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, CreatedResponse, GiftRecord, SearchParams, GIFT_COLLECTION,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/gifts",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching gifts", body = [GiftRecord]),
        (status = 422, description = "Invalid query parameters", body = ApiResponse),
        (status = 500, description = "Database unavailable", body = ApiResponse)
    )
)]
pub async fn search_gifts_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<GiftRecord>>, HandlerError> {
    let Query(params) = params.map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("Invalid query parameters: {}", e))),
        )
    })?;
    let limit = params.limit().map_err(|reason| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::field_error(
                "limit",
                &reason,
                format!("Invalid query parameter 'limit': {}", reason),
            )),
        )
    })?;

    let db = require_db(&state)?;
    let filter = params.to_filter();
    let docs = db
        .get_documents(GIFT_COLLECTION, &filter, limit)
        .await
        .map_err(|e| store_error("Failed to search gifts", e))?;

    let mut gifts = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.id.clone();
        match GiftRecord::try_from(doc) {
            Ok(record) => gifts.push(record),
            // Documents written around this API may not carry the gift shape.
            Err(e) => tracing::warn!(id = %id, error = %e, "skipping malformed gift document"),
        }
    }
    Ok(Json(gifts))
}

#[utoipa::path(
    post,
    path = "/api/gifts",
    request_body = Gift,
    responses(
        (status = 200, description = "Gift created", body = CreatedResponse),
        (status = 422, description = "Unprocessable entity (invalid gift body)", body = ApiResponse),
        (status = 500, description = "Database unavailable", body = ApiResponse)
    )
)]
pub async fn create_gift_handler(
    State(state): State<AppState>,
    request: Result<Json<Gift>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HandlerError> {
    let Json(gift) = request.map_err(|e| {
        json_422(
            e,
            "{\"gift\": str, \"background\": str, \"pattern\": str, ...}",
        )
    })?;
    gift.validate().map_err(schema_error)?;

    let db = require_db(&state)?;
    let id = db
        .create_document(Gift::COLLECTION, &gift)
        .await
        .map_err(|e| store_error("Failed to create gift", e))?;
    Ok(Json(CreatedResponse { id }))
}
