use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version plus which optional backends are wired up.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "ai_configured": state.config.gemini_api_key.is_some(),
        "export_configured": state.config.pdf_render_command.is_some(),
        "revision": state.store.snapshot().revision
    }))
}
