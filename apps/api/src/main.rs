mod assistant;
mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::Assistant;
use crate::config::Config;
use crate::export::{CommandPdfExporter, PdfExporter, UnconfiguredExporter};
use crate::llm_client::{GeminiClient, ModelChain};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let store = ResumeStore::new();

    // Initialize the AI provider and its fallback chain
    let gemini = GeminiClient::new(config.gemini_api_key.clone())?;
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY not set; AI actions will fail after validation");
    }
    let chain = ModelChain::new(
        Arc::new(gemini),
        config.ai_models.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    );
    info!(
        "AI model chain: {} ({}s per attempt)",
        config.ai_models.join(" -> "),
        config.ai_timeout_secs
    );
    let assistant = Assistant::new(store.clone(), chain);

    // Initialize PDF export
    let exporter: Arc<dyn PdfExporter> = match config
        .pdf_render_command
        .as_deref()
        .and_then(CommandPdfExporter::from_command_line)
    {
        Some(command) => {
            info!("PDF export via '{}'", command.program());
            Arc::new(command)
        }
        None => {
            warn!("PDF_RENDER_COMMAND not set; export is disabled");
            Arc::new(UnconfiguredExporter)
        }
    };

    // Build app state
    let state = AppState {
        store,
        assistant,
        exporter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
