use crate::domain::model::{Gift, Product, User};
use crate::transport::http::handlers::{diagnostics, gifts, health, schema};
use crate::transport::http::types::{
    ApiResponse, CreatedResponse, DiagnosticResponse, GiftRecord, MessageResponse,
};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Gift Search API"),
    paths(
        health::root_handler,
        diagnostics::diagnostics_handler,
        schema::schema_handler,
        gifts::search_gifts_handler,
        gifts::create_gift_handler
    ),
    components(schemas(
        ApiResponse,
        MessageResponse,
        CreatedResponse,
        DiagnosticResponse,
        GiftRecord,
        Gift,
        Product,
        User
    ))
)]
pub struct ApiDoc;

/// Builds the full application: routes, Swagger UI, open CORS and request tracing.
pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/test", get(diagnostics::diagnostics_handler))
        .route("/schema", get(schema::schema_handler))
        .route(
            "/api/gifts",
            get(gifts::search_gifts_handler).post(gifts::create_gift_handler),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
