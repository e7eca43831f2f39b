use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Vowline API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Bookings, vendor payouts and galleries for the wedding marketplace",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "docs": "/docs"
        }
    }))
}

#[utoipa::path(get, path = "/health", tag = "Health", responses((status = 200, description = "Service is up")))]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
