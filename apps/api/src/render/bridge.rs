//! In-place editing bridge between the rendered preview and the store.
//!
//! A rendered field carries a `FieldBinding` naming exactly which store operation its
//! edits feed. Committing a binding is the only way the rendering layer mutates the
//! document, and it always goes through `update_personal_info`, `update_summary` or
//! `update_entry`; ids come from the document, never from here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    EducationPatch, EntryId, EntryPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch,
    SectionKind, SkillPatch,
};
use crate::store::ResumeStore;

#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("'{field}' is not an editable field of {section} entries")]
    FieldNotInSection {
        field: &'static str,
        section: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    JobTitle,
    Website,
}

impl PersonalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalField::FullName => "fullName",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::Location => "location",
            PersonalField::JobTitle => "jobTitle",
            PersonalField::Website => "website",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    Company,
    Position,
    Location,
    StartDate,
    EndDate,
    Description,
    School,
    Degree,
    Field,
    Name,
    Link,
}

impl EntryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::Company => "company",
            EntryField::Position => "position",
            EntryField::Location => "location",
            EntryField::StartDate => "startDate",
            EntryField::EndDate => "endDate",
            EntryField::Description => "description",
            EntryField::School => "school",
            EntryField::Degree => "degree",
            EntryField::Field => "field",
            EntryField::Name => "name",
            EntryField::Link => "link",
        }
    }
}

/// Which document field a rendered value came from, and therefore where edits go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum FieldBinding {
    PersonalInfo {
        field: PersonalField,
    },
    Summary,
    Entry {
        section: SectionKind,
        id: EntryId,
        field: EntryField,
    },
}

impl FieldBinding {
    pub fn personal(field: PersonalField) -> Self {
        FieldBinding::PersonalInfo { field }
    }

    pub fn entry(section: SectionKind, id: &EntryId, field: EntryField) -> Self {
        FieldBinding::Entry {
            section,
            id: id.clone(),
            field,
        }
    }

    /// Stable dotted key, e.g. `personalInfo.fullName` or `experience.<id>.description`.
    pub fn key(&self) -> String {
        match self {
            FieldBinding::PersonalInfo { field } => format!("personalInfo.{}", field.as_str()),
            FieldBinding::Summary => "summary".to_string(),
            FieldBinding::Entry { section, id, field } => {
                format!("{}.{}.{}", section.as_str(), id, field.as_str())
            }
        }
    }

    /// Feeds an edited value back into the store. Returns whether the document changed.
    pub fn commit(&self, store: &ResumeStore, value: String) -> Result<bool, BindingError> {
        Ok(match self {
            FieldBinding::PersonalInfo { field } => {
                store.update_personal_info(&personal_patch(*field, value))
            }
            FieldBinding::Summary => store.update_summary(value),
            FieldBinding::Entry { section, id, field } => {
                store.update_entry(id, &entry_patch(*section, *field, value)?)
            }
        })
    }
}

fn personal_patch(field: PersonalField, value: String) -> PersonalInfoPatch {
    let mut patch = PersonalInfoPatch::default();
    let slot = match field {
        PersonalField::FullName => &mut patch.full_name,
        PersonalField::Email => &mut patch.email,
        PersonalField::Phone => &mut patch.phone,
        PersonalField::Location => &mut patch.location,
        PersonalField::JobTitle => &mut patch.job_title,
        PersonalField::Website => &mut patch.website,
    };
    *slot = Some(value);
    patch
}

fn entry_patch(
    section: SectionKind,
    field: EntryField,
    value: String,
) -> Result<EntryPatch, BindingError> {
    let value = Some(value);
    let patch = match (section, field) {
        (SectionKind::Experience, EntryField::Company) => EntryPatch::Experience(ExperiencePatch {
            company: value,
            ..Default::default()
        }),
        (SectionKind::Experience, EntryField::Position) => {
            EntryPatch::Experience(ExperiencePatch {
                position: value,
                ..Default::default()
            })
        }
        (SectionKind::Experience, EntryField::Location) => {
            EntryPatch::Experience(ExperiencePatch {
                location: value,
                ..Default::default()
            })
        }
        (SectionKind::Experience, EntryField::StartDate) => {
            EntryPatch::Experience(ExperiencePatch {
                start_date: value,
                ..Default::default()
            })
        }
        (SectionKind::Experience, EntryField::EndDate) => EntryPatch::Experience(ExperiencePatch {
            end_date: value,
            ..Default::default()
        }),
        (SectionKind::Experience, EntryField::Description) => {
            EntryPatch::Experience(ExperiencePatch {
                description: value,
                ..Default::default()
            })
        }
        (SectionKind::Education, EntryField::School) => EntryPatch::Education(EducationPatch {
            school: value,
            ..Default::default()
        }),
        (SectionKind::Education, EntryField::Degree) => EntryPatch::Education(EducationPatch {
            degree: value,
            ..Default::default()
        }),
        (SectionKind::Education, EntryField::Field) => EntryPatch::Education(EducationPatch {
            field: value,
            ..Default::default()
        }),
        (SectionKind::Education, EntryField::StartDate) => EntryPatch::Education(EducationPatch {
            start_date: value,
            ..Default::default()
        }),
        (SectionKind::Education, EntryField::EndDate) => EntryPatch::Education(EducationPatch {
            end_date: value,
            ..Default::default()
        }),
        (SectionKind::Education, EntryField::Location) => EntryPatch::Education(EducationPatch {
            location: value,
            ..Default::default()
        }),
        (SectionKind::Skills, EntryField::Name) => EntryPatch::Skill(SkillPatch {
            name: value,
            ..Default::default()
        }),
        (SectionKind::Projects, EntryField::Name) => EntryPatch::Project(ProjectPatch {
            name: value,
            ..Default::default()
        }),
        (SectionKind::Projects, EntryField::Description) => EntryPatch::Project(ProjectPatch {
            description: value,
            ..Default::default()
        }),
        (SectionKind::Projects, EntryField::Link) => EntryPatch::Project(ProjectPatch {
            link: value,
            ..Default::default()
        }),
        (section, field) => {
            return Err(BindingError::FieldNotInSection {
                field: field.as_str(),
                section: section.as_str(),
            })
        }
    };
    Ok(patch)
}

// ────────────────────────────────────────────────────────────────────────────
// Reorder controls
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A swap of two adjacent entries, ready to hand to `ResumeStore::reorder_entries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveAction {
    pub section: SectionKind,
    pub from: usize,
    pub to: usize,
}

impl MoveAction {
    pub fn apply(&self, store: &ResumeStore) -> bool {
        store.reorder_entries(self.section, self.from, self.to)
    }
}

/// Move up / move down affordances of one list entry. Absent at the list edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveControls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_up: Option<MoveAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_down: Option<MoveAction>,
}

impl MoveControls {
    pub fn for_position(section: SectionKind, index: usize, len: usize) -> Self {
        let move_up = (index > 0 && index < len).then(|| MoveAction {
            section,
            from: index,
            to: index - 1,
        });
        let move_down = (index < len.saturating_sub(1)).then(|| MoveAction {
            section,
            from: index,
            to: index + 1,
        });
        Self { move_up, move_down }
    }

    pub fn get(&self, direction: MoveDirection) -> Option<MoveAction> {
        match direction {
            MoveDirection::Up => self.move_up,
            MoveDirection::Down => self.move_down,
        }
    }
}
