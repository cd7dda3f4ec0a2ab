use std::sync::Arc;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::export::PdfExporter;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single resume session this process serves.
    pub store: ResumeStore,
    /// Holds its own handle to `store` for writing results back.
    pub assistant: Assistant,
    /// `CommandPdfExporter` when `PDF_RENDER_COMMAND` is set, otherwise `UnconfiguredExporter`.
    pub exporter: Arc<dyn PdfExporter>,
    pub config: Config,
}
