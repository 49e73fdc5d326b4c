use axum::Json;
use serde_json::{json, Value};

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "agritrust server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
