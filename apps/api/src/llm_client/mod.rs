//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! The assistant talks to a `ModelChain`, which talks to a `CompletionProvider`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fallback order used when `AI_MODELS` is not set: fast model first.
pub const DEFAULT_MODELS: [&str; 2] = ["gemini-1.5-flash", "gemini-1.5-pro"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Model {model} did not answer within {secs}s")]
    Timeout { model: String, secs: u64 },

    #[error("Gemini API key not configured")]
    NotConfigured,

    #[error("No models configured")]
    NoModels,
}

impl LlmError {
    /// True when the provider signalled rate limiting (HTTP 429 or a message naming it).
    pub fn is_rate_limited(&self) -> bool {
        match self {
            LlmError::Api { status, message } => *status == 429 || message.contains("429"),
            LlmError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }
}

/// A black-box text completion endpoint addressed by model name.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GenerateContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` over HTTPS. Without an API key every call fails with
/// `LlmError::NotConfigured`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let body = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&response.bytes().await?)?;
        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback chain
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Model that produced `text`.
    pub model: String,
    /// Models tried, including the successful one.
    pub attempts: usize,
}

/// Tries each model in order and stops at the first non-empty answer. A model is only
/// skipped when it fails or times out; the last failure is returned if all of them do.
#[derive(Clone)]
pub struct ModelChain {
    provider: Arc<dyn CompletionProvider>,
    models: Vec<String>,
    attempt_timeout: Duration,
}

impl ModelChain {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        models: Vec<String>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            models,
            attempt_timeout,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        let mut last_error = None;

        for (index, model) in self.models.iter().enumerate() {
            debug!(model = %model, "Attempting completion");
            let attempt = self.provider.complete(model, prompt);
            let outcome = match tokio::time::timeout(self.attempt_timeout, attempt).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout {
                    model: model.clone(),
                    secs: self.attempt_timeout.as_secs(),
                }),
            };

            match outcome.and_then(non_empty) {
                Ok(text) => {
                    info!(model = %model, attempts = index + 1, "Completion succeeded");
                    return Ok(Completion {
                        text,
                        model: model.clone(),
                        attempts: index + 1,
                    });
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::NoModels))
    }
}

fn non_empty(text: String) -> Result<String, LlmError> {
    if text.trim().is_empty() {
        Err(LlmError::EmptyContent)
    } else {
        Ok(text)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(api_error(429, "Too Many Requests").is_rate_limited());
        assert!(api_error(500, "upstream said [429 Too Many Requests]").is_rate_limited());
        assert!(!api_error(500, "boom").is_rate_limited());
        assert!(!LlmError::EmptyContent.is_rate_limited());
    }

    #[test]
    fn test_gemini_response_text() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello world"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_network() {
        let client = GeminiClient::new(None).unwrap();
        assert!(!client.is_configured());
        let err = client.complete("gemini-1.5-flash", "hi").await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }

    #[tokio::test]
    async fn test_primary_success_stops_chain() {
        let provider = ScriptedProvider::new([Reply::Text("ok".to_string())]);
        let done = chain(provider.clone()).complete("p").await.unwrap();
        assert_eq!(done.model, "gemini-1.5-flash");
        assert_eq!(done.attempts, 1);
        assert_eq!(provider.models_called(), vec!["gemini-1.5-flash"]);
    }

    #[tokio::test]
    async fn test_falls_back_after_primary_failure() {
        let provider = ScriptedProvider::new([
            Reply::Fail(api_error(503, "overloaded")),
            Reply::Text("Experienced engineer...".to_string()),
        ]);
        let done = chain(provider.clone()).complete("p").await.unwrap();
        assert_eq!(done.text, "Experienced engineer...");
        assert_eq!(done.attempts, 2);
        assert_eq!(
            provider.models_called(),
            vec!["gemini-1.5-flash", "gemini-1.5-pro"]
        );
    }

    #[tokio::test]
    async fn test_empty_answer_counts_as_failure() {
        let provider = ScriptedProvider::new([
            Reply::Text("   ".to_string()),
            Reply::Text("real".to_string()),
        ]);
        let done = chain(provider).complete("p").await.unwrap();
        assert_eq!(done.model, "gemini-1.5-pro");
    }

    #[tokio::test]
    async fn test_all_models_failing_returns_last_error() {
        let provider = ScriptedProvider::new([
            Reply::Fail(api_error(500, "first")),
            Reply::Fail(api_error(429, "second")),
        ]);
        let err = chain(provider).complete("p").await.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_model_times_out_and_falls_back() {
        let provider = ScriptedProvider::new([Reply::Hang, Reply::Text("late but fine".to_string())]);
        let done = chain(provider).complete("p").await.unwrap();
        assert_eq!(done.text, "late but fine");
        assert_eq!(done.attempts, 2);
    }

    #[tokio::test]
    async fn test_empty_chain_reports_no_models() {
        let provider = ScriptedProvider::new(Vec::<Reply>::new());
        let chain = ModelChain::new(provider, Vec::new(), Duration::from_secs(1));
        assert!(matches!(
            chain.complete("p").await.unwrap_err(),
            LlmError::NoModels
        ));
    }
}
