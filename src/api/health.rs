use axum::response::Json;
use serde_json::{Value, json};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Suno API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs"
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy"
    }))
}
