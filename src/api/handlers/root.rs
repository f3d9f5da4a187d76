use super::{success, Envelope};
use axum::response::IntoResponse;
use serde_json::Value;

#[utoipa::path(
    get,
    path = "/api/v1",
    responses(
        (status = 200, description = "API is up", body = Envelope, content_type = "application/json"),
    ),
    tag = "myapi"
)]
// axum handler for the API root
pub async fn root() -> impl IntoResponse {
    success("ok", Value::Null)
}
