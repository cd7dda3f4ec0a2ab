use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODELS;

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent means AI actions fail after validation with the generic message.
    pub gemini_api_key: Option<String>,
    /// Fallback order, first model tried first.
    pub ai_models: Vec<String>,
    pub ai_timeout_secs: u64,
    /// `<cmd> <input.html> <output.pdf>`; absent disables export.
    pub pdf_render_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            ai_models: match optional_env("AI_MODELS") {
                Some(raw) => parse_models(&raw).context("AI_MODELS is invalid")?,
                None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            },
            ai_timeout_secs: parse_timeout(optional_env("AI_TIMEOUT_SECS").as_deref())
                .context("AI_TIMEOUT_SECS must be a positive number of seconds")?,
            pdf_render_command: optional_env("PDF_RENDER_COMMAND"),
        })
    }
}

/// Set and not blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_models(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        bail!("at least one model name is required");
    }
    Ok(models)
}

fn parse_timeout(raw: Option<&str>) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(30);
    };
    let secs = raw.parse::<u64>()?;
    if secs == 0 {
        bail!("timeout must be greater than zero");
    }
    Ok(secs)
}
