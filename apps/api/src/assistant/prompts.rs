// Prompt templates for the AI assist actions.
// Every template is filled with `.replace("{placeholder}", value)`; nothing else is
// interpolated, so the same document always yields the same prompt.

/// Professional summary. Replace `{role}` and `{experience_context}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "As a professional career coach, generate a high-impact professional summary for a {role}.
{experience_context}
The summary should be concise (3-4 sentences), action-oriented, and highlight key achievements or potential.
Format: A single paragraph.";

/// Used for `{experience_context}` when there are experience descriptions.
pub const SUMMARY_EXPERIENCE_CONTEXT: &str = "Context of their experience: {experience}.";

/// Used for `{experience_context}` when there is nothing to go on.
pub const SUMMARY_NO_EXPERIENCE_CONTEXT: &str =
    "The user is just starting out or focusing on this specific role.";

/// Single bullet rewrite. Replace `{bullet}`.
pub const IMPROVE_BULLET_PROMPT_TEMPLATE: &str = "Improve the following resume bullet point to be more impact-driven and quantified: \"{bullet}\".
Use strong action verbs and include metrics or specific outcomes where possible.
Output: Only the improved bullet point.";

/// Keyword tailoring. Replace `{job_description}` and `{resume_content}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = "Tailor the following resume content to better fit this job description:

Job Description:
{job_description}

Resume Content:
{resume_content}

Optimize the content by highlighting relevant skills and keywords while maintaining honesty.
Output: JSON format with optimized sections.";

/// Job description the keyword action tailors against.
pub const KEYWORD_TARGET: &str = "modern tech industry standards";

/// Resume scoring. Replace `{resume_content}`.
pub const SCORE_PROMPT_TEMPLATE: &str = "Analyze the following resume and provide a score from 0-100 based on:
1. Impact of bullet points
2. Professional summary quality
3. Keyword optimization
4. Format and readability

Resume Content:
{resume_content}

Output: JSON format with \"score\", \"suggestions\" (array), and \"ats_feedback\" (string).";

pub fn summary(role: &str, experience: &str) -> String {
    let context = if experience.is_empty() {
        SUMMARY_NO_EXPERIENCE_CONTEXT.to_string()
    } else {
        SUMMARY_EXPERIENCE_CONTEXT.replace("{experience}", experience)
    };
    SUMMARY_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{experience_context}", &context)
}

pub fn improve_bullet(bullet: &str) -> String {
    IMPROVE_BULLET_PROMPT_TEMPLATE.replace("{bullet}", bullet)
}

pub fn tailor(job_description: &str, resume_content: &str) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_content}", resume_content)
}

pub fn score(resume_content: &str) -> String {
    SCORE_PROMPT_TEMPLATE.replace("{resume_content}", resume_content)
}
