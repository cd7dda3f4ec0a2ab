//! Best-effort extraction of structured data from free-form model replies.
//!
//! Nothing here fails: a reply that does not contain a usable JSON object is kept
//! as raw text.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::llm_client::strip_json_fences;

/// Finds a JSON object inside `text`.
///
/// The slice from the first `{` to the last `}` is tried first; when that does not
/// parse (prose with stray braces), each balanced `{...}` block is tried in order.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        if let Ok(Value::Object(map)) = serde_json::from_str(&text[start..=end]) {
            return Some(map);
        }
    }

    text.match_indices('{').find_map(|(open, _)| {
        let close = balanced_end(&text[open..])?;
        match serde_json::from_str(&text[open..open + close]) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

/// Byte length of the balanced `{...}` block at the start of `text`, honouring JSON
/// string literals and escapes.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub suggestions: Vec<String>,
    pub ats_feedback: String,
}

impl ScoreReport {
    /// Reads `score`, `suggestions` and `ats_feedback`. Only `score` is required; it may
    /// be a number or a numeric string such as `"82"` or `"82/100"`.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let score = match map.get("score")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.split('/').next()?.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !score.is_finite() {
            return None;
        }
        let suggestions = match map.get("suggestions") {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };
        let ats_feedback = map.get("ats_feedback").map(value_text).unwrap_or_default();
        Some(Self {
            score: score.round().clamp(0.0, 100.0) as u32,
            suggestions,
            ats_feedback,
        })
    }
}

/// Keyword suggestions keyed by section or keyword, in key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordReport(pub Vec<(String, String)>);

impl KeywordReport {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut entries: Vec<(String, String)> =
            map.iter().map(|(k, v)| (k.clone(), value_text(v))).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self(entries)
    }
}

/// What a keyword or scoring action hands back to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    Score(ScoreReport),
    Keywords { suggestions: KeywordReport },
    Raw { text: String },
}

impl Insight {
    pub fn score(text: &str) -> Self {
        extract_json_object(text)
            .and_then(|map| ScoreReport::from_map(&map))
            .map(Insight::Score)
            .unwrap_or_else(|| Insight::Raw {
                text: text.to_string(),
            })
    }

    pub fn keywords(text: &str) -> Self {
        match extract_json_object(text) {
            Some(map) => Insight::Keywords {
                suggestions: KeywordReport::from_map(&map),
            },
            None => Insight::Raw {
                text: text.to_string(),
            },
        }
    }

    /// Plain-text rendition for a notification.
    pub fn display_text(&self) -> String {
        match self {
            Insight::Score(report) => format!(
                "Resume Score: {}/100\n\nATS Feedback: {}\n\nTop Suggestions:\n{}",
                report.score,
                report.ats_feedback,
                report.suggestions.join("\n")
            ),
            Insight::Keywords { suggestions } => format!(
                "Keyword Optimization Suggestions:\n\n{}",
                suggestions
                    .0
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            ),
            Insight::Raw { text } => format!("AI Suggestions:\n\n{text}"),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_ignores_surrounding_prose() {
        let text = r#"Here you go: {"score": 82, "suggestions": ["Add metrics"], "ats_feedback": "Good"} extra"#;
        let Insight::Score(report) = Insight::score(text) else {
            panic!("expected structured score");
        };
        assert_eq!(report.score, 82);
        assert_eq!(report.suggestions, vec!["Add metrics"]);
        assert_eq!(report.ats_feedback, "Good");
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let text = "```json\n{\"score\": \"75/100\", \"suggestions\": []}\n```";
        assert!(matches!(Insight::score(text), Insight::Score(ScoreReport { score: 75, .. })));
    }

    #[test]
    fn test_stray_braces_fall_back_to_balanced_block() {
        let text = r#"Use {braces} wisely. {"score": 60, "suggestions": ["a", "b"]} and {more}"#;
        let Insight::Score(report) = Insight::score(text) else {
            panic!("expected structured score");
        };
        assert_eq!(report.score, 60);
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_matching() {
        let text = r#"x {"score": 90, "ats_feedback": "use } and { carefully"} y"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["ats_feedback"], "use } and { carefully");
    }

    #[test]
    fn test_unparseable_reply_degrades_to_raw_text() {
        let text = "Your resume looks great, no JSON today.";
        assert_eq!(
            Insight::score(text),
            Insight::Raw {
                text: text.to_string()
            }
        );
        assert!(Insight::score(text).display_text().starts_with("AI Suggestions:"));
    }

    #[test]
    fn test_score_without_score_field_is_raw() {
        let text = r#"{"suggestions": ["x"]}"#;
        assert!(matches!(Insight::score(text), Insight::Raw { .. }));
        assert!(matches!(Insight::keywords(text), Insight::Keywords { .. }));
    }

    #[test]
    fn test_keyword_display() {
        let insight = Insight::keywords(r#"{"summary": "Mention Rust", "skills": ["Tokio", "Axum"]}"#);
        assert_eq!(
            insight.display_text(),
            "Keyword Optimization Suggestions:\n\nskills: [\"Tokio\",\"Axum\"]\n\nsummary: Mention Rust"
        );
    }

    #[test]
    fn test_score_display() {
        let insight = Insight::Score(ScoreReport {
            score: 82,
            suggestions: vec!["Add metrics".to_string(), "Trim".to_string()],
            ats_feedback: "Good".to_string(),
        });
        assert_eq!(
            insight.display_text(),
            "Resume Score: 82/100\n\nATS Feedback: Good\n\nTop Suggestions:\nAdd metrics\nTrim"
        );
    }
}
