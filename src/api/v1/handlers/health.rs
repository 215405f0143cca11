/*
 * Responsibility
 * - GET /health (liveness)
 * - registered Anonymous: answers without any Authorization header
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
