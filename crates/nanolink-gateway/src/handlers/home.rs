use crate::model::MessageResponse;
use axum::Json;

pub async fn home_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to NanoLink API <3",
    })
}
