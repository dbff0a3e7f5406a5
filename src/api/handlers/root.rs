use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Lyceum API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Course platform with paid materials and update notifications",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login",
            "materials": "/materials",
            "subscriptions": "/subscription/create",
            "users": "/users"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
