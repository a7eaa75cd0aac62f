use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "photoshare",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

pub async fn welcome() -> &'static str {
    "Welcome to the PhotoShare API"
}
