//! Axum route handlers for the template catalog, the live preview and the
//! in-place editing bridge.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::SectionKind;
use crate::render::bridge::{FieldBinding, MoveControls, MoveDirection};
use crate::render::layout::LayoutId;
use crate::render::template::{catalog, TemplateId, TemplateInfo};
use crate::render::theme::ThemeId;
use crate::render::{render, RenderedResume};
use crate::state::AppState;
use crate::store::handlers::MutationResponse;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LayoutInfo {
    pub id: LayoutId,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ThemeInfo {
    pub id: ThemeId,
    pub name: &'static str,
    pub primary: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub layouts: Vec<LayoutInfo>,
    pub themes: Vec<ThemeInfo>,
    pub templates: Vec<TemplateInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub format: PreviewFormat,
    /// Renders with this template instead of the document's own, without storing it.
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub zoom: f64,
    pub revision: u64,
    pub rendered: RenderedResume,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub binding: FieldBinding,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub section: SectionKind,
    pub index: usize,
    pub direction: MoveDirection,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        layouts: LayoutId::ALL
            .into_iter()
            .map(|id| LayoutInfo {
                id,
                name: id.display_name(),
                description: id.description(),
            })
            .collect(),
        themes: ThemeId::ALL
            .into_iter()
            .map(|id| ThemeInfo {
                id,
                name: id.display_name(),
                primary: id.palette().primary,
            })
            .collect(),
        templates: catalog(),
    })
}

/// GET /api/v1/preview?format=json|html&template=<id>
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let snapshot = state.store.snapshot();
    let template = TemplateId::parse(
        query
            .template
            .as_deref()
            .unwrap_or(&snapshot.document.template_id),
    );
    let rendered = render(&snapshot.document, template.layout, template.theme);

    match query.format {
        PreviewFormat::Html => {
            let title = snapshot.document.personal_info.full_name.trim();
            let title = if title.is_empty() { "Resume" } else { title };
            Html(rendered.to_html_document(title)).into_response()
        }
        PreviewFormat::Json => Json(PreviewResponse {
            zoom: snapshot.zoom,
            revision: snapshot.revision,
            rendered,
        })
        .into_response(),
    }
}

/// POST /api/v1/preview/edits
///
/// Commits the text of one editable field back into the document.
pub async fn handle_edit(
    State(state): State<AppState>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let changed = request.binding.commit(&state.store, request.value)?;
    Ok(Json(MutationResponse {
        changed,
        snapshot: state.store.snapshot(),
    }))
}

/// POST /api/v1/preview/move
///
/// Runs the move-up or move-down control of the entry at `index`.
pub async fn handle_move(
    State(state): State<AppState>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = body?;
    let len = state.store.document().section_len(request.section);
    let action = MoveControls::for_position(request.section, request.index, len)
        .get(request.direction)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Entry {} of {} cannot move {:?}",
                request.index,
                request.section.as_str(),
                request.direction
            ))
        })?;
    let changed = action.apply(&state.store);
    Ok(Json(MutationResponse {
        changed,
        snapshot: state.store.snapshot(),
    }))
}
