//! Axum route handler for PDF export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::export::{content_disposition, export_filename, ExportJob};
use crate::render::{render_document, RENDER_TARGET_ID};
use crate::state::AppState;

/// POST /api/v1/export
///
/// Renders the current document and returns the PDF as an attachment named
/// after the person on the resume.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let doc = state.store.document();
    let rendered = render_document(&doc);
    let filename = export_filename(&doc.personal_info.full_name);

    let job = ExportJob {
        html: rendered.to_html_document(&filename),
        target_id: RENDER_TARGET_ID,
        page: rendered.page,
    };
    let pdf = state.exporter.export(&job).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        pdf,
    )
        .into_response())
}
