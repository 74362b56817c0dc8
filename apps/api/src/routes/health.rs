use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "excel-interviewer-api",
        "llm_configured": state.config.llm_configured()
    }))
}

/// GET /api
pub async fn api_root_handler() -> Json<Value> {
    Json(json!({
        "message": "Excel Mock Interviewer API",
        "status": "running"
    }))
}
