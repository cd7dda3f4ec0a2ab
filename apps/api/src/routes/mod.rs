pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::export::handlers as export;
use crate::render::handlers as preview;
use crate::state::AppState;
use crate::store::handlers as resume;
use crate::store::photo::MAX_PHOTO_BYTES;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume document and session state
        .route("/api/v1/resume", get(resume::handle_get_resume))
        .route(
            "/api/v1/resume/personal-info",
            patch(resume::handle_update_personal_info),
        )
        .route("/api/v1/resume/summary", put(resume::handle_update_summary))
        .route("/api/v1/resume/template", put(resume::handle_set_template))
        .route(
            "/api/v1/resume/page-settings",
            patch(resume::handle_update_page_settings),
        )
        .route(
            "/api/v1/resume/page-format",
            put(resume::handle_apply_page_format),
        )
        .route("/api/v1/resume/page-size", put(resume::handle_resize_page))
        .route("/api/v1/resume/zoom", put(resume::handle_set_zoom))
        .route("/api/v1/resume/zoom/step", post(resume::handle_step_zoom))
        .route("/api/v1/resume/ai-open", put(resume::handle_set_ai_open))
        .route(
            "/api/v1/resume/sections/:section",
            post(resume::handle_add_entry).patch(resume::handle_reorder_entries),
        )
        .route(
            "/api/v1/resume/sections/:section/:id",
            patch(resume::handle_update_entry).delete(resume::handle_remove_entry),
        )
        .route(
            "/api/v1/resume/photo",
            post(resume::handle_upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .route("/api/v1/resume/photo-url", put(resume::handle_set_photo_url))
        // Rendering
        .route("/api/v1/templates", get(preview::handle_templates))
        .route("/api/v1/preview", get(preview::handle_preview))
        .route("/api/v1/preview/edits", post(preview::handle_edit))
        .route("/api/v1/preview/move", post(preview::handle_move))
        // AI assist
        .route("/api/v1/assistant", get(assistant::handle_status))
        .route("/api/v1/assistant/:action", post(assistant::handle_run))
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}
