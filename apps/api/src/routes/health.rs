use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and the active suggestion chain.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "career-api",
        "matchPolicy": state.config.match_policy.to_string(),
        "sources": state.engine.source_names(),
        "filePatterns": state.file_store.info().ok().map(|i| i.pattern_count),
    }))
}
