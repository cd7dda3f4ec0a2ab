//! Axum route handlers for the AI assist actions.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::assistant::actions::AiAction;
use crate::assistant::ActionReport;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssistantStatus {
    pub configured: bool,
    pub models: Vec<String>,
    pub in_flight: Vec<AiAction>,
}

/// GET /api/v1/assistant
pub async fn handle_status(State(state): State<AppState>) -> Json<AssistantStatus> {
    Json(AssistantStatus {
        configured: state.config.gemini_api_key.is_some(),
        models: state.assistant.models().to_vec(),
        in_flight: AiAction::ALL
            .into_iter()
            .filter(|a| state.assistant.is_busy(*a))
            .collect(),
    })
}

/// POST /api/v1/assistant/:action
///
/// Runs one assist action against the current document. Validation failures,
/// rate limits and provider failures come back as distinct error codes; the
/// document is only touched on success.
pub async fn handle_run(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Json<ActionReport>, AppError> {
    let action = AiAction::from_key(&action)
        .ok_or_else(|| AppError::NotFound(format!("AI action '{action}'")))?;

    let report = state.assistant.run(action).await?;
    Ok(Json(report))
}
