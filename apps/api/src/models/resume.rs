use serde::{Deserialize, Serialize};

use crate::models::list::{Entry, EntryId, EntryList};

/// Template used for a freshly started session.
pub const DEFAULT_TEMPLATE_ID: &str = "classic-midnight";

/// Level given to new skills. Carried in the document; no layout renders it.
pub const DEFAULT_SKILL_LEVEL: &str = "Intermediate";

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// The four list-valued sections of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub job_title: String,
    pub website: String,
    /// Either a `data:` URL holding an uploaded image or a plain image URL.
    pub profile_photo: String,
}

/// Where the profile photo comes from, classified from `PersonalInfo::profile_photo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource<'a> {
    Embedded(&'a str),
    Url(&'a str),
}

impl PersonalInfo {
    pub fn photo_source(&self) -> Option<PhotoSource<'_>> {
        let photo = self.profile_photo.trim();
        if photo.is_empty() {
            None
        } else if photo.starts_with("data:") {
            Some(PhotoSource::Embedded(photo))
        } else {
            Some(PhotoSource::Url(photo))
        }
    }

    pub fn merged(&self, patch: &PersonalInfoPatch) -> Self {
        Self {
            full_name: pick(&patch.full_name, &self.full_name),
            email: pick(&patch.email, &self.email),
            phone: pick(&patch.phone, &self.phone),
            location: pick(&patch.location, &self.location),
            job_title: pick(&patch.job_title, &self.job_title),
            website: pick(&patch.website, &self.website),
            profile_photo: pick(&patch.profile_photo, &self.profile_photo),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub profile_photo: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: EntryId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl Entry for ExperienceEntry {
    type Patch = ExperiencePatch;

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            company: String::new(),
            position: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            current: false,
            description: String::new(),
        }
    }

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn merged(&self, patch: &ExperiencePatch) -> Self {
        Self {
            id: self.id.clone(),
            company: pick(&patch.company, &self.company),
            position: pick(&patch.position, &self.position),
            location: pick(&patch.location, &self.location),
            start_date: pick(&patch.start_date, &self.start_date),
            end_date: pick(&patch.end_date, &self.end_date),
            current: patch.current.unwrap_or(self.current),
            description: pick(&patch.description, &self.description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: EntryId,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
}

impl Entry for EducationEntry {
    type Patch = EducationPatch;

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            school: String::new(),
            degree: String::new(),
            field: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            location: String::new(),
        }
    }

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn merged(&self, patch: &EducationPatch) -> Self {
        Self {
            id: self.id.clone(),
            school: pick(&patch.school, &self.school),
            degree: pick(&patch.degree, &self.degree),
            field: pick(&patch.field, &self.field),
            start_date: pick(&patch.start_date, &self.start_date),
            end_date: pick(&patch.end_date, &self.end_date),
            location: pick(&patch.location, &self.location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<String>,
}

impl Entry for SkillEntry {
    type Patch = SkillPatch;

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            name: String::new(),
            level: DEFAULT_SKILL_LEVEL.to_string(),
        }
    }

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn merged(&self, patch: &SkillPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: pick(&patch.name, &self.name),
            level: pick(&patch.level, &self.level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl Entry for ProjectEntry {
    type Patch = ProjectPatch;

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            link: String::new(),
        }
    }

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn merged(&self, patch: &ProjectPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: pick(&patch.name, &self.name),
            description: pick(&patch.description, &self.description),
            link: pick(&patch.link, &self.link),
        }
    }
}

/// A partial update addressed to one section. The variant selects the section.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPatch {
    Experience(ExperiencePatch),
    Education(EducationPatch),
    Skill(SkillPatch),
    Project(ProjectPatch),
}

impl EntryPatch {
    /// Decodes a JSON patch body for `section`. Unknown fields are rejected.
    pub fn from_json(
        section: SectionKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match section {
            SectionKind::Experience => EntryPatch::Experience(serde_json::from_value(value)?),
            SectionKind::Education => EntryPatch::Education(serde_json::from_value(value)?),
            SectionKind::Skills => EntryPatch::Skill(serde_json::from_value(value)?),
            SectionKind::Projects => EntryPatch::Project(serde_json::from_value(value)?),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page settings
// ────────────────────────────────────────────────────────────────────────────

/// Smallest width or height (mm) a custom page may be resized to.
pub const MIN_PAGE_DIMENSION_MM: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFormat {
    A4,
    Letter,
    Custom,
}

impl PageFormat {
    /// Paper size in millimetres, for the fixed formats.
    pub fn dimensions_mm(&self) -> Option<(f64, f64)> {
        match self {
            PageFormat::A4 => Some((210.0, 297.0)),
            PageFormat::Letter => Some((215.9, 279.4)),
            PageFormat::Custom => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub format: PageFormat,
    /// Millimetres.
    pub width: f64,
    /// Millimetres.
    pub height: f64,
    /// Pixels of padding around the rendered content.
    pub margins: u32,
    pub crop_to_content: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            width: 210.0,
            height: 297.0,
            margins: 40,
            crop_to_content: false,
        }
    }
}

impl PageSettings {
    pub fn merged(&self, patch: &PageSettingsPatch) -> Self {
        Self {
            format: patch.format.unwrap_or(self.format),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            margins: patch.margins.unwrap_or(self.margins),
            crop_to_content: patch.crop_to_content.unwrap_or(self.crop_to_content),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageSettingsPatch {
    pub format: Option<PageFormat>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margins: Option<u32>,
    pub crop_to_content: Option<bool>,
}

impl PageSettingsPatch {
    /// Patch selecting a fixed paper format together with its dimensions.
    /// `Custom` only switches the format and keeps the current size.
    pub fn preset(format: PageFormat) -> Self {
        let (width, height) = match format.dimensions_mm() {
            Some((w, h)) => (Some(w), Some(h)),
            None => (None, None),
        };
        Self {
            format: Some(format),
            width,
            height,
            ..Default::default()
        }
    }

    /// Patch for a free-form resize. Switches to `Custom` and floors both sides.
    pub fn resize(width_mm: f64, height_mm: f64) -> Self {
        Self {
            format: Some(PageFormat::Custom),
            width: Some(floor_dimension(width_mm)),
            height: Some(floor_dimension(height_mm)),
            ..Default::default()
        }
    }
}

fn floor_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_PAGE_DIMENSION_MM)
    } else {
        MIN_PAGE_DIMENSION_MM
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// The whole resume. Cloning is cheap: collections are shared until modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: EntryList<ExperienceEntry>,
    #[serde(default)]
    pub education: EntryList<EducationEntry>,
    #[serde(default)]
    pub skills: EntryList<SkillEntry>,
    #[serde(default)]
    pub projects: EntryList<ProjectEntry>,
    #[serde(default = "default_template_id")]
    pub template_id: String,
    #[serde(default)]
    pub page_settings: PageSettings,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            experience: EntryList::default(),
            education: EntryList::default(),
            skills: EntryList::default(),
            projects: EntryList::default(),
            template_id: default_template_id(),
            page_settings: PageSettings::default(),
        }
    }
}

impl ResumeDocument {
    pub fn section_len(&self, section: SectionKind) -> usize {
        match section {
            SectionKind::Experience => self.experience.len(),
            SectionKind::Education => self.education.len(),
            SectionKind::Skills => self.skills.len(),
            SectionKind::Projects => self.projects.len(),
        }
    }

    pub fn section_ids(&self, section: SectionKind) -> Vec<EntryId> {
        match section {
            SectionKind::Experience => self.experience.ids(),
            SectionKind::Education => self.education.ids(),
            SectionKind::Skills => self.skills.ids(),
            SectionKind::Projects => self.projects.ids(),
        }
    }
}

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

fn pick(patch: &Option<String>, current: &str) -> String {
    patch.clone().unwrap_or_else(|| current.to_string())
}
