use crate::transport::http::types::MessageResponse;
use axum::Json;

pub const ROOT_MESSAGE: &str = "Gift Search Backend Running";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = MessageResponse)
    )
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}
