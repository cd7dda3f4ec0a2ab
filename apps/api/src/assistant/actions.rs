use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assistant::prompts;
use crate::models::{EntryId, ResumeDocument};

pub const JOB_TITLE_REQUIRED: &str =
    "Please enter a Job Title in the Personal section first so the AI knows what to write about!";
pub const BULLET_SOURCE_REQUIRED: &str =
    "Please add an experience entry with a description first to use 'Impact Bullets'.";
pub const SCORING_JOB_TITLE_REQUIRED: &str =
    "Please enter a Job Title first for accurate scoring and optimization.";
pub const SCORING_EXPERIENCE_REQUIRED: &str =
    "Please add at least one experience entry to calculate a professional score.";

/// The four user-triggerable assist actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiAction {
    Summary,
    Bullets,
    Keywords,
    Scoring,
}

impl AiAction {
    pub const ALL: [AiAction; 4] = [
        AiAction::Summary,
        AiAction::Bullets,
        AiAction::Keywords,
        AiAction::Scoring,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::Summary => "summary",
            AiAction::Bullets => "bullets",
            AiAction::Keywords => "keywords",
            AiAction::Scoring => "scoring",
        }
    }

    fn index(&self) -> usize {
        match self {
            AiAction::Summary => 0,
            AiAction::Bullets => 1,
            AiAction::Keywords => 2,
            AiAction::Scoring => 3,
        }
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a completed answer is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Summary,
    /// The description of the experience entry the bullet was taken from.
    ExperienceDescription(EntryId),
    /// Shown to the user; the document is not changed.
    Insight,
}

/// An action that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAction {
    pub prompt: String,
    pub target: Target,
}

/// Checks `action`'s preconditions against `doc` and builds its prompt.
/// The error is the user-facing rejection message.
pub fn prepare(action: AiAction, doc: &ResumeDocument) -> Result<PreparedAction, &'static str> {
    let job_title = doc.personal_info.job_title.trim();
    let (prompt, target) = match action {
        AiAction::Summary => {
            if job_title.is_empty() {
                return Err(JOB_TITLE_REQUIRED);
            }
            let experience = doc
                .experience
                .iter()
                .map(|e| e.description.trim())
                .filter(|d| !d.is_empty())
                .collect::<Vec<_>>()
                .join(". ");
            (prompts::summary(job_title, &experience), Target::Summary)
        }
        AiAction::Bullets => {
            let recent = doc
                .experience
                .first()
                .filter(|e| !e.description.trim().is_empty())
                .ok_or(BULLET_SOURCE_REQUIRED)?;
            (
                prompts::improve_bullet(&recent.description),
                Target::ExperienceDescription(recent.id.clone()),
            )
        }
        AiAction::Keywords | AiAction::Scoring => {
            if job_title.is_empty() {
                return Err(SCORING_JOB_TITLE_REQUIRED);
            }
            if doc.experience.is_empty() {
                return Err(SCORING_EXPERIENCE_REQUIRED);
            }
            let content = resume_content(doc);
            let prompt = if action == AiAction::Scoring {
                prompts::score(&content)
            } else {
                prompts::tailor(prompts::KEYWORD_TARGET, &content)
            };
            (prompt, Target::Insight)
        }
    };
    Ok(PreparedAction {
        prompt,
        target,
    })
}

/// Role, experience lines and skills, as the tailoring and scoring prompts expect.
pub fn resume_content(doc: &ResumeDocument) -> String {
    let experience = doc
        .experience
        .iter()
        .map(|e| format!("{} at {}: {}", e.position, e.company, e.description))
        .collect::<Vec<_>>()
        .join("\n");
    let skills = doc
        .skills
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Role: {}\nExperience: {}\nSkills: {}",
        doc.personal_info.job_title.trim(),
        experience,
        skills
    )
}

/// Per-action flags, indexed by `AiAction`.
#[derive(Debug, Default)]
pub(crate) struct ActionFlags([bool; 4]);

impl ActionFlags {
    /// Sets the flag; false if it was already set.
    pub(crate) fn acquire(&mut self, action: AiAction) -> bool {
        !std::mem::replace(&mut self.0[action.index()], true)
    }

    pub(crate) fn release(&mut self, action: AiAction) {
        self.0[action.index()] = false;
    }

    pub(crate) fn is_set(&self, action: AiAction) -> bool {
        self.0[action.index()]
    }
}
