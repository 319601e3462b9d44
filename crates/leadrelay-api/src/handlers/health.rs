use axum::{http::StatusCode, response::IntoResponse, Json};

/// Liveness probe - simple check that process is running
/// Always returns 200 if process can respond
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}
