use crate::app::database_service::DatabaseService;
use crate::domain::model::{CollectionModel, Gift, SchemaRegistry};
use crate::domain::DocumentFilter;
use crate::storage::Document;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_SEARCH_LIMIT: i64 = 24;
pub const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Clone, Debug)]
pub struct AppState {
    /// `None` when `DATABASE_URL` is unset or malformed.
    pub db_service: Option<DatabaseService>,
    pub schema_registry: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(db_service: Option<DatabaseService>) -> Self {
        Self {
            db_service,
            schema_registry: Arc::new(SchemaRegistry::with_defaults()),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn field_error(field: &str, reason: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(serde_json::json!({ "field": field, "reason": reason })),
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CreatedResponse {
    /// Identifier assigned to the new record (24 hex characters).
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
}

/// Query parameters of `GET /api/gifts`. All optional; empty values are ignored.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Gift type
    pub gift: Option<String>,
    /// Background
    pub background: Option<String>,
    /// Pattern
    pub pattern: Option<String>,
    /// Number
    pub number: Option<String>,
    /// Free text search in title/description/tags
    pub q: Option<String>,
    /// Maximum number of results (1..=100, default 24)
    #[param(minimum = 1, maximum = 100, default = 24)]
    pub limit: Option<i64>,
}

impl SearchParams {
    /// The effective limit, or the reason it is unacceptable.
    pub fn limit(&self) -> Result<usize, String> {
        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(format!(
                "must be between 1 and {} (got {})",
                MAX_SEARCH_LIMIT, limit
            ));
        }
        Ok(limit as usize)
    }

    pub fn to_filter(&self) -> DocumentFilter {
        DocumentFilter::new()
            .where_eq_opt("gift", self.gift.as_deref())
            .where_eq_opt("background", self.background.as_deref())
            .where_eq_opt("pattern", self.pattern.as_deref())
            .where_eq_opt("number", self.number.as_deref())
            .text(self.q.as_deref(), Gift::TEXT_SEARCH_FIELDS)
    }
}

/// A gift as returned to clients: the stored record plus its string `id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct GiftRecord {
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[serde(flatten)]
    pub gift: Gift,
}

impl TryFrom<Document> for GiftRecord {
    type Error = serde_json::Error;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let mut body = doc.body;
        body.remove("_id");
        body.remove("id");
        let gift: Gift = serde_json::from_value(JsonValue::Object(body))?;
        Ok(GiftRecord { id: doc.id, gift })
    }
}

pub const GIFT_COLLECTION: &str = <Gift as CollectionModel>::COLLECTION;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DiagnosticResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

pub fn json_422(err: impl std::fmt::Display, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
