//! AI Assist Orchestrator.
//!
//! One invocation walks `Idle → Validating → (Rejected | Requesting) → (Completed |
//! Failed)`. Validation reads the current document; a completed answer is written
//! back through the store's own operations. While an action is Requesting, the same
//! action cannot be started again; other actions and store edits are unaffected.

pub mod actions;
pub mod handlers;
pub mod parse;
pub mod prompts;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmError, ModelChain};
use crate::models::{EntryId, EntryPatch, ExperiencePatch};
use crate::store::ResumeStore;
use actions::{ActionFlags, AiAction, Target};
use parse::Insight;

pub const RATE_LIMIT_MESSAGE: &str = "The AI is currently taking a short breather (Rate limit reached). Please wait about 60 seconds and try again! ☕";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to connect to AI service. Please check your internet and API key.";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("rejected: {0}")]
    Rejected(&'static str),

    #[error("rate limited: {0}")]
    RateLimited(#[source] LlmError),

    #[error("completion failed: {0}")]
    Failed(#[source] LlmError),

    #[error("{0} is already in progress")]
    Busy(AiAction),
}

impl ActionError {
    /// Message shown to the user. Provider details never leak into it.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Rejected(message) => message.to_string(),
            ActionError::RateLimited(_) => RATE_LIMIT_MESSAGE.to_string(),
            ActionError::Failed(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            ActionError::Busy(action) => {
                format!("An AI request for '{action}' is already in progress.")
            }
        }
    }
}

impl From<LlmError> for ActionError {
    fn from(err: LlmError) -> Self {
        if err.is_rate_limited() {
            ActionError::RateLimited(err)
        } else {
            ActionError::Failed(err)
        }
    }
}

/// What a completed action did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    SummaryUpdated {
        text: String,
    },
    /// `applied` is false when the entry was removed while the request was running.
    BulletImproved {
        entry_id: EntryId,
        text: String,
        applied: bool,
    },
    Insight {
        insight: Insight,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionReport {
    pub action: AiAction,
    pub model: String,
    pub attempts: usize,
    pub outcome: ActionOutcome,
}

#[derive(Clone)]
pub struct Assistant {
    store: ResumeStore,
    chain: ModelChain,
    in_flight: Arc<Mutex<ActionFlags>>,
}

impl Assistant {
    pub fn new(store: ResumeStore, chain: ModelChain) -> Self {
        Self {
            store,
            chain,
            in_flight: Arc::new(Mutex::new(ActionFlags::default())),
        }
    }

    pub fn models(&self) -> &[String] {
        self.chain.models()
    }

    pub fn is_busy(&self, action: AiAction) -> bool {
        self.flags().is_set(action)
    }

    pub async fn run(&self, action: AiAction) -> Result<ActionReport, ActionError> {
        let _guard = self.begin(action)?;

        let prepared = actions::prepare(action, &self.store.document()).map_err(|message| {
            info!(%action, reason = message, "AI action rejected");
            ActionError::Rejected(message)
        })?;

        info!(%action, "AI action requesting");
        let completion = self.chain.complete(&prepared.prompt).await.map_err(|e| {
            warn!(%action, error = %e, "AI action failed");
            ActionError::from(e)
        })?;

        let outcome = self.route(action, prepared.target, completion.text);
        self.store.set_ai_open(false);
        info!(%action, model = %completion.model, "AI action completed");

        Ok(ActionReport {
            action,
            model: completion.model,
            attempts: completion.attempts,
            outcome,
        })
    }

    fn route(&self, action: AiAction, target: Target, text: String) -> ActionOutcome {
        match target {
            Target::Summary => {
                let text = text.trim().to_string();
                self.store.update_summary(text.clone());
                ActionOutcome::SummaryUpdated { text }
            }
            Target::ExperienceDescription(entry_id) => {
                let text = text.trim().to_string();
                let applied = self.store.update_entry(
                    &entry_id,
                    &EntryPatch::Experience(ExperiencePatch {
                        description: Some(text.clone()),
                        ..Default::default()
                    }),
                );
                ActionOutcome::BulletImproved {
                    entry_id,
                    text,
                    applied,
                }
            }
            Target::Insight => {
                let insight = if action == AiAction::Scoring {
                    Insight::score(&text)
                } else {
                    Insight::keywords(&text)
                };
                let message = insight.display_text();
                ActionOutcome::Insight { insight, message }
            }
        }
    }

    fn begin(&self, action: AiAction) -> Result<InFlight, ActionError> {
        if !self.flags().acquire(action) {
            return Err(ActionError::Busy(action));
        }
        Ok(InFlight {
            flags: Arc::clone(&self.in_flight),
            action,
        })
    }

    fn flags(&self) -> std::sync::MutexGuard<'_, ActionFlags> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the action's in-flight flag when the invocation ends, including when the
/// caller stops polling it.
struct InFlight {
    flags: Arc<Mutex<ActionFlags>>,
    action: AiAction,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release(self.action);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::llm_client::testing::{api_error, chain, Reply, ScriptedProvider};
    use crate::models::{PersonalInfoPatch, SectionKind};

    fn assistant(provider: Arc<ScriptedProvider>) -> (Assistant, ResumeStore) {
        let store = ResumeStore::new();
        (Assistant::new(store.clone(), chain(provider)), store)
    }

    fn set_job_title(store: &ResumeStore, title: &str) {
        store.update_personal_info(&PersonalInfoPatch {
            job_title: Some(title.to_string()),
            ..Default::default()
        });
    }

    fn add_experience(store: &ResumeStore, description: &str) -> EntryId {
        let id = store.add_entry(SectionKind::Experience);
        store.update_entry(
            &id,
            &EntryPatch::Experience(ExperiencePatch {
                position: Some("Engineer".to_string()),
                company: Some("Acme".to_string()),
                description: Some(description.to_string()),
                ..Default::default()
            }),
        );
        id
    }

    async fn wait_for_calls(provider: &ScriptedProvider, n: usize) {
        while provider.models_called().len() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_missing_job_title_rejects_without_calls() {
        let provider = ScriptedProvider::new([Reply::Text("unused".to_string())]);
        let (assistant, _store) = assistant(provider.clone());

        let err = assistant.run(AiAction::Summary).await.unwrap_err();
        assert!(matches!(err, ActionError::Rejected(actions::JOB_TITLE_REQUIRED)));
        assert!(provider.models_called().is_empty());
        assert!(!assistant.is_busy(AiAction::Summary));
    }

    #[tokio::test]
    async fn test_summary_falls_back_to_second_model() {
        let provider = ScriptedProvider::new([
            Reply::Fail(api_error(500, "flash exploded")),
            Reply::Text("Experienced engineer...".to_string()),
        ]);
        let (assistant, store) = assistant(provider.clone());
        set_job_title(&store, "Platform Engineer");
        store.set_ai_open(true);

        let report = assistant.run(AiAction::Summary).await.unwrap();
        assert_eq!(report.attempts, 2);
        assert_eq!(report.model, "gemini-1.5-pro");
        assert_eq!(
            provider.models_called(),
            vec!["gemini-1.5-flash", "gemini-1.5-pro"]
        );
        assert_eq!(store.document().summary, "Experienced engineer...");
        assert!(!store.snapshot().is_ai_open, "panel closes after a result");
    }

    #[tokio::test]
    async fn test_rate_limit_gets_distinct_message() {
        let provider = ScriptedProvider::new([
            Reply::Fail(api_error(429, "Resource exhausted")),
            Reply::Fail(api_error(429, "Resource exhausted")),
        ]);
        let (assistant, store) = assistant(provider);
        set_job_title(&store, "PM");
        store.set_ai_open(true);

        let err = assistant.run(AiAction::Summary).await.unwrap_err();
        assert!(matches!(err, ActionError::RateLimited(_)));
        assert_eq!(err.user_message(), RATE_LIMIT_MESSAGE);
        assert!(store.snapshot().is_ai_open, "panel stays open on failure");
        assert_eq!(store.document().summary, "");
    }

    #[tokio::test]
    async fn test_other_failures_get_generic_message() {
        let provider = ScriptedProvider::new([
            Reply::Fail(api_error(500, "a")),
            Reply::Fail(LlmError::NotConfigured),
        ]);
        let (assistant, store) = assistant(provider);
        set_job_title(&store, "PM");

        let err = assistant.run(AiAction::Summary).await.unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_end_in_generic_failure() {
        let provider = ScriptedProvider::new([Reply::Hang, Reply::Hang]);
        let (assistant, store) = assistant(provider);
        set_job_title(&store, "PM");

        let err = assistant.run(AiAction::Summary).await.unwrap_err();
        assert!(matches!(err, ActionError::Failed(LlmError::Timeout { .. })));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_scoring_parses_structured_reply() {
        let provider = ScriptedProvider::new([Reply::Text(
            r#"Here you go: {"score": 82, "suggestions": ["Add metrics"], "ats_feedback": "Good"} extra"#
                .to_string(),
        )]);
        let (assistant, store) = assistant(provider.clone());
        set_job_title(&store, "SRE");
        add_experience(&store, "Kept the lights on");
        let before = store.document();

        let report = assistant.run(AiAction::Scoring).await.unwrap();
        let ActionOutcome::Insight {
            insight: Insight::Score(score),
            ..
        } = report.outcome
        else {
            panic!("expected a score insight");
        };
        assert_eq!(score.score, 82);
        assert_eq!(score.suggestions.len(), 1);
        assert_eq!(*store.document(), *before, "scoring never edits the document");
        assert!(provider.prompts()[0].contains("Engineer at Acme: Kept the lights on"));
    }

    #[tokio::test]
    async fn test_keywords_fall_back_to_raw_text() {
        let provider = ScriptedProvider::new([Reply::Text("Add more verbs.".to_string())]);
        let (assistant, store) = assistant(provider.clone());
        set_job_title(&store, "SRE");
        add_experience(&store, "");

        let report = assistant.run(AiAction::Keywords).await.unwrap();
        assert_eq!(
            report.outcome,
            ActionOutcome::Insight {
                insight: Insight::Raw {
                    text: "Add more verbs.".to_string()
                },
                message: "AI Suggestions:\n\nAdd more verbs.".to_string(),
            }
        );
        assert!(provider.prompts()[0].contains("modern tech industry standards"));
    }

    #[tokio::test]
    async fn test_bullets_rewrite_first_entry_only() {
        let provider = ScriptedProvider::new([Reply::Text(
            "  Cut deploy time 40% by automating releases.\n".to_string(),
        )]);
        let (assistant, store) = assistant(provider);
        let first = add_experience(&store, "Did deploys");
        let second = add_experience(&store, "Other job");

        let report = assistant.run(AiAction::Bullets).await.unwrap();
        assert!(matches!(
            report.outcome,
            ActionOutcome::BulletImproved { applied: true, .. }
        ));
        let doc = store.document();
        assert_eq!(
            doc.experience.get(0).unwrap().description,
            "Cut deploy time 40% by automating releases."
        );
        assert_eq!(doc.experience.get(0).unwrap().id, first);
        assert_eq!(doc.experience.get(1).unwrap().id, second);
        assert_eq!(doc.experience.get(1).unwrap().description, "Other job");
    }

    #[tokio::test]
    async fn test_bullet_for_removed_entry_is_dropped() {
        let gate = Arc::new(Notify::new());
        let provider = ScriptedProvider::new([Reply::Gated(gate.clone(), "Better".to_string())]);
        let (assistant, store) = assistant(provider.clone());
        let id = add_experience(&store, "Did things");

        let task = tokio::spawn({
            let assistant = assistant.clone();
            async move { assistant.run(AiAction::Bullets).await }
        });
        wait_for_calls(&provider, 1).await;

        // Edits keep working while the request is outstanding.
        assert!(store.remove_entry(SectionKind::Experience, &id));
        gate.notify_one();

        let report = task.await.unwrap().unwrap();
        assert!(matches!(
            report.outcome,
            ActionOutcome::BulletImproved { applied: false, .. }
        ));
        assert!(store.document().experience.is_empty());
    }

    #[tokio::test]
    async fn test_same_action_cannot_run_twice_concurrently() {
        let gate = Arc::new(Notify::new());
        let provider = ScriptedProvider::new([
            Reply::Gated(gate.clone(), "First summary".to_string()),
            Reply::Text(r#"{"score": 70}"#.to_string()),
        ]);
        let (assistant, store) = assistant(provider.clone());
        set_job_title(&store, "SRE");
        add_experience(&store, "Ops");

        let first = tokio::spawn({
            let assistant = assistant.clone();
            async move { assistant.run(AiAction::Summary).await }
        });
        wait_for_calls(&provider, 1).await;
        assert!(assistant.is_busy(AiAction::Summary));

        let again = assistant.run(AiAction::Summary).await.unwrap_err();
        assert!(matches!(again, ActionError::Busy(AiAction::Summary)));

        let other = assistant.run(AiAction::Scoring).await.unwrap();
        assert_eq!(other.action, AiAction::Scoring);

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!assistant.is_busy(AiAction::Summary));
        assert_eq!(store.document().summary, "First summary");
    }

    #[tokio::test]
    async fn test_cancelled_run_releases_guard() {
        let provider = ScriptedProvider::new([Reply::Hang]);
        let (assistant, store) = assistant(provider.clone());
        set_job_title(&store, "SRE");

        let run = assistant.run(AiAction::Summary);
        let timed_out = tokio::time::timeout(Duration::from_millis(10), run).await;
        assert!(timed_out.is_err());
        assert!(!assistant.is_busy(AiAction::Summary));
    }
}
