//! API request handlers.

/// Persisted report listing handlers.
pub mod reports;
/// Research job submission, status, and cancellation handlers.
pub mod research;

use axum::Json;
use serde_json::{Value, json};

/// Liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
