use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "vision-qa-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
