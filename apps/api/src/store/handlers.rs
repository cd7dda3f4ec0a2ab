//! Axum route handlers for the resume document and session UI state.
//!
//! Every mutation answers with whether anything changed plus the resulting
//! snapshot, so a client never has to re-fetch after an edit.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::models::{EntryId, EntryPatch, PageFormat, PageSettingsPatch, PersonalInfoPatch, SectionKind};
use crate::store::{photo, ResumeStore, StoreSnapshot};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub changed: bool,
    pub snapshot: Arc<StoreSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub id: EntryId,
    pub snapshot: Arc<StoreSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ZoomResponse {
    pub zoom: f64,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PageFormatRequest {
    pub format: PageFormat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeRequest {
    pub width_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub zoom: f64,
}

#[derive(Debug, Deserialize)]
pub struct ZoomStepRequest {
    pub steps: i32,
}

#[derive(Debug, Deserialize)]
pub struct AiOpenRequest {
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct PhotoUrlRequest {
    pub url: String,
}

fn mutation(store: &ResumeStore, changed: bool) -> Json<MutationResponse> {
    Json(MutationResponse {
        changed,
        snapshot: store.snapshot(),
    })
}

/// Body-limit failures become 413; anything else is a malformed form.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Photo uploads are limited to {} MB",
            photo::MAX_PHOTO_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}

fn section(key: &str) -> Result<SectionKind, AppError> {
    SectionKind::from_key(key).ok_or_else(|| AppError::NotFound(format!("Section '{key}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Arc<StoreSnapshot>> {
    Json(state.store.snapshot())
}

/// PATCH /api/v1/resume/personal-info
///
/// A `profilePhoto` value goes through the same checks as the photo-url route;
/// an empty string clears the photo.
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    body: Result<Json<PersonalInfoPatch>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(mut patch) = body?;
    if let Some(url) = patch.profile_photo.as_mut() {
        if !url.trim().is_empty() {
            *url = photo::validate_url(url)?;
        }
    }
    let changed = state.store.update_personal_info(&patch);
    Ok(mutation(&state.store, changed))
}

/// PUT /api/v1/resume/summary
pub async fn handle_update_summary(
    State(state): State<AppState>,
    body: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = state.store.update_summary(request.summary);
    Ok(mutation(&state.store, changed))
}

/// PUT /api/v1/resume/template
///
/// Any id is stored as given; unknown ids fall back to defaults at render time.
pub async fn handle_set_template(
    State(state): State<AppState>,
    body: Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = state.store.set_template(request.template_id);
    Ok(mutation(&state.store, changed))
}

/// PATCH /api/v1/resume/page-settings
pub async fn handle_update_page_settings(
    State(state): State<AppState>,
    body: Result<Json<PageSettingsPatch>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(patch) = body?;
    let changed = state.store.update_page_settings(&patch);
    Ok(mutation(&state.store, changed))
}

/// PUT /api/v1/resume/page-format
pub async fn handle_apply_page_format(
    State(state): State<AppState>,
    body: Result<Json<PageFormatRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = state.store.apply_page_format(request.format);
    Ok(mutation(&state.store, changed))
}

/// PUT /api/v1/resume/page-size
pub async fn handle_resize_page(
    State(state): State<AppState>,
    body: Result<Json<PageSizeRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = state.store.resize_page(request.width_mm, request.height_mm);
    Ok(mutation(&state.store, changed))
}

// ────────────────────────────────────────────────────────────────────────────
// Session UI state
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/resume/zoom
pub async fn handle_set_zoom(
    State(state): State<AppState>,
    body: Result<Json<ZoomRequest>, JsonRejection>,
) -> Result<Json<ZoomResponse>, AppError> {
    let Json(request) = body?;
    Ok(Json(ZoomResponse {
        zoom: state.store.set_zoom(request.zoom),
    }))
}

/// POST /api/v1/resume/zoom/step
pub async fn handle_step_zoom(
    State(state): State<AppState>,
    body: Result<Json<ZoomStepRequest>, JsonRejection>,
) -> Result<Json<ZoomResponse>, AppError> {
    let Json(request) = body?;
    Ok(Json(ZoomResponse {
        zoom: state.store.step_zoom(request.steps),
    }))
}

/// PUT /api/v1/resume/ai-open
pub async fn handle_set_ai_open(
    State(state): State<AppState>,
    body: Result<Json<AiOpenRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = state.store.set_ai_open(request.open);
    Ok(mutation(&state.store, changed))
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/sections/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AddEntryResponse>, AppError> {
    let id = state.store.add_entry(section(&key)?);
    Ok(Json(AddEntryResponse {
        id,
        snapshot: state.store.snapshot(),
    }))
}

/// PATCH /api/v1/resume/sections/:section
///
/// Moves the entry at `from` to `to`. Out-of-range positions change nothing.
pub async fn handle_reorder_entries(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let kind = section(&key)?;
    let Json(request) = body?;
    let changed = state.store.reorder_entries(kind, request.from, request.to);
    Ok(mutation(&state.store, changed))
}

/// PATCH /api/v1/resume/sections/:section/:id
///
/// The body is a partial entry for that section; unknown fields are rejected.
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let kind = section(&key)?;
    let Json(value) = body?;
    let patch = EntryPatch::from_json(kind, value)
        .map_err(|e| AppError::Validation(format!("Invalid {key} patch: {e}")))?;
    let changed = state.store.update_entry(&EntryId::from(id), &patch);
    Ok(mutation(&state.store, changed))
}

/// DELETE /api/v1/resume/sections/:section/:id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, String)>,
) -> Result<Json<MutationResponse>, AppError> {
    let kind = section(&key)?;
    let changed = state.store.remove_entry(kind, &EntryId::from(id));
    Ok(mutation(&state.store, changed))
}

// ────────────────────────────────────────────────────────────────────────────
// Profile photo
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/photo
///
/// Multipart form with a single `file` field holding an image. The image is
/// embedded in the document as a data URL.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MutationResponse>, AppError> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Multipart error", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Read error", e))?;
        upload = Some((content_type, data.to_vec()));
    }

    let (content_type, data) = upload
        .ok_or_else(|| AppError::Validation("Missing file in multipart form".to_string()))?;

    let data_url = photo::to_data_url(content_type.as_deref(), &data).map_err(|e| {
        warn!(content_type = ?content_type, error = %e, "Rejected photo upload");
        AppError::from(e)
    })?;

    let changed = state.store.set_profile_photo(data_url);
    Ok(mutation(&state.store, changed))
}

/// PUT /api/v1/resume/photo-url
pub async fn handle_set_photo_url(
    State(state): State<AppState>,
    body: Result<Json<PhotoUrlRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let url = photo::validate_url(&request.url)?;
    let changed = state.store.set_profile_photo(url);
    Ok(mutation(&state.store, changed))
}
