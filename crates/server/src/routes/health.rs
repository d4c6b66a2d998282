use axum::response::Json as ResponseJson;
use serde_json::{Value, json};

/// GET /health
pub async fn health() -> ResponseJson<Value> {
    ResponseJson(json!({ "ok": true }))
}
