//! Resume Document Store: the only writer of the resume document.
//!
//! State lives in a `tokio::sync::watch` channel holding an `Arc<StoreSnapshot>`. Every
//! operation computes the next snapshot from the previous one inside the channel's write
//! lock and swaps it in whole, so a reader always sees either the old or the new state.
//! Subscribers are woken only when a snapshot actually changed; no-op operations
//! (unknown ids, empty patches, out-of-range reorders) leave the snapshot, its revision
//! and every pointer inside it untouched.

pub mod handlers;
pub mod photo;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::models::{
    EducationEntry, Entry, EntryId, EntryPatch, ExperienceEntry, PageFormat, PageSettingsPatch,
    PersonalInfoPatch, ProjectEntry, ResumeDocument, SectionKind, SkillEntry,
};

pub const MIN_ZOOM: f64 = 0.4;
pub const MAX_ZOOM: f64 = 1.5;
pub const DEFAULT_ZOOM: f64 = 0.7;
/// Increment used by the preview's zoom buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Everything the store holds: the document plus session-scoped UI state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub document: Arc<ResumeDocument>,
    /// Preview scale factor, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    pub zoom: f64,
    pub is_ai_open: bool,
    /// Incremented on every applied change.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl StoreSnapshot {
    fn initial() -> Self {
        Self {
            document: Arc::new(ResumeDocument::default()),
            zoom: DEFAULT_ZOOM,
            is_ai_open: false,
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    fn with_document(&self, document: ResumeDocument) -> Self {
        Self {
            document: Arc::new(document),
            ..self.clone()
        }
    }
}

/// Clamps a requested zoom into the allowed range. Non-finite input yields `None`.
pub fn clamp_zoom(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(MIN_ZOOM, MAX_ZOOM))
}

/// Shared handle to the session's resume state. Cheap to clone; all clones address
/// the same state.
#[derive(Clone)]
pub struct ResumeStore {
    tx: Arc<watch::Sender<Arc<StoreSnapshot>>>,
}

impl Default for ResumeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(StoreSnapshot::initial()));
        Self { tx: Arc::new(tx) }
    }

    // ── reads ────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn document(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.tx.borrow().document)
    }

    /// Receiver woken after every applied change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.tx.subscribe()
    }

    // ── collection operations ────────────────────────────────────────────────

    /// Appends a blank entry to `section` and returns its fresh id.
    pub fn add_entry(&self, section: SectionKind) -> EntryId {
        let id = EntryId::generate();
        let new_id = id.clone();
        self.edit_document("add_entry", move |doc| {
            let mut next = doc.clone();
            match section {
                SectionKind::Experience => {
                    next.experience = doc.experience.with_added(ExperienceEntry::blank(new_id))
                }
                SectionKind::Education => {
                    next.education = doc.education.with_added(EducationEntry::blank(new_id))
                }
                SectionKind::Skills => {
                    next.skills = doc.skills.with_added(SkillEntry::blank(new_id))
                }
                SectionKind::Projects => {
                    next.projects = doc.projects.with_added(ProjectEntry::blank(new_id))
                }
            }
            Some(next)
        });
        id
    }

    /// Merges `patch` into the entry `id` of the patch's section. Unknown ids are ignored.
    pub fn update_entry(&self, id: &EntryId, patch: &EntryPatch) -> bool {
        self.edit_document("update_entry", |doc| {
            let mut next = doc.clone();
            match patch {
                EntryPatch::Experience(p) => next.experience = doc.experience.with_updated(id, p)?,
                EntryPatch::Education(p) => next.education = doc.education.with_updated(id, p)?,
                EntryPatch::Skill(p) => next.skills = doc.skills.with_updated(id, p)?,
                EntryPatch::Project(p) => next.projects = doc.projects.with_updated(id, p)?,
            }
            Some(next)
        })
    }

    /// Removes entry `id` from `section`. Unknown ids are ignored.
    pub fn remove_entry(&self, section: SectionKind, id: &EntryId) -> bool {
        self.edit_document("remove_entry", |doc| {
            let mut next = doc.clone();
            match section {
                SectionKind::Experience => next.experience = doc.experience.without(id)?,
                SectionKind::Education => next.education = doc.education.without(id)?,
                SectionKind::Skills => next.skills = doc.skills.without(id)?,
                SectionKind::Projects => next.projects = doc.projects.without(id)?,
            }
            Some(next)
        })
    }

    /// Moves the entry at `from` to `to` within `section`.
    /// Out-of-range indices leave the list as it is.
    pub fn reorder_entries(&self, section: SectionKind, from: usize, to: usize) -> bool {
        self.edit_document("reorder_entries", |doc| {
            let mut next = doc.clone();
            match section {
                SectionKind::Experience => next.experience = doc.experience.reordered(from, to)?,
                SectionKind::Education => next.education = doc.education.reordered(from, to)?,
                SectionKind::Skills => next.skills = doc.skills.reordered(from, to)?,
                SectionKind::Projects => next.projects = doc.projects.reordered(from, to)?,
            }
            Some(next)
        })
    }

    // ── scalar operations ────────────────────────────────────────────────────

    pub fn update_personal_info(&self, patch: &PersonalInfoPatch) -> bool {
        self.edit_document("update_personal_info", |doc| {
            let personal_info = doc.personal_info.merged(patch);
            (personal_info != doc.personal_info).then(|| ResumeDocument {
                personal_info,
                ..doc.clone()
            })
        })
    }

    pub fn set_profile_photo(&self, photo: String) -> bool {
        self.update_personal_info(&PersonalInfoPatch {
            profile_photo: Some(photo),
            ..Default::default()
        })
    }

    pub fn update_summary(&self, summary: impl Into<String>) -> bool {
        let summary = summary.into();
        self.edit_document("update_summary", move |doc| {
            (summary != doc.summary).then(|| ResumeDocument {
                summary,
                ..doc.clone()
            })
        })
    }

    /// Stores the composite template id as given; unknown ids are resolved to the
    /// fallback layout/theme at render time.
    pub fn set_template(&self, template_id: impl Into<String>) -> bool {
        let template_id = template_id.into();
        self.edit_document("set_template", move |doc| {
            (template_id != doc.template_id).then(|| ResumeDocument {
                template_id,
                ..doc.clone()
            })
        })
    }

    pub fn update_page_settings(&self, patch: &PageSettingsPatch) -> bool {
        self.edit_document("update_page_settings", |doc| {
            let page_settings = doc.page_settings.merged(patch);
            (page_settings != doc.page_settings).then(|| ResumeDocument {
                page_settings,
                ..doc.clone()
            })
        })
    }

    pub fn apply_page_format(&self, format: PageFormat) -> bool {
        self.update_page_settings(&PageSettingsPatch::preset(format))
    }

    pub fn resize_page(&self, width_mm: f64, height_mm: f64) -> bool {
        self.update_page_settings(&PageSettingsPatch::resize(width_mm, height_mm))
    }

    /// Sets the preview zoom, clamped to [`MIN_ZOOM`, `MAX_ZOOM`]. Returns the stored value.
    pub fn set_zoom(&self, zoom: f64) -> f64 {
        if let Some(zoom) = clamp_zoom(zoom) {
            self.apply("set_zoom", |snap| {
                (snap.zoom != zoom).then(|| StoreSnapshot {
                    zoom,
                    ..snap.clone()
                })
            });
        }
        self.snapshot().zoom
    }

    /// Adds `steps × ZOOM_STEP` to the current zoom, clamped. Returns the stored value.
    pub fn step_zoom(&self, steps: i32) -> f64 {
        let mut stored = DEFAULT_ZOOM;
        self.apply("step_zoom", |snap| {
            let target = snap.zoom + f64::from(steps) * ZOOM_STEP;
            // Round away float drift so repeated steps land on tenths.
            let zoom = clamp_zoom((target * 100.0).round() / 100.0).unwrap_or(snap.zoom);
            stored = zoom;
            (snap.zoom != zoom).then(|| StoreSnapshot {
                zoom,
                ..snap.clone()
            })
        });
        stored
    }

    pub fn set_ai_open(&self, open: bool) -> bool {
        self.apply("set_ai_open", |snap| {
            (snap.is_ai_open != open).then(|| StoreSnapshot {
                is_ai_open: open,
                ..snap.clone()
            })
        })
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn edit_document<F>(&self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&ResumeDocument) -> Option<ResumeDocument>,
    {
        self.apply(op, |snap| f(&snap.document).map(|doc| snap.with_document(doc)))
    }

    /// Runs `f` against the current snapshot under the channel lock. `Some` replaces the
    /// snapshot and notifies subscribers; `None` leaves everything untouched.
    fn apply<F>(&self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&StoreSnapshot) -> Option<StoreSnapshot>,
    {
        let mut revision = 0;
        let changed = self.tx.send_if_modified(|current| match f(&**current) {
            Some(mut next) => {
                next.revision = current.revision + 1;
                next.updated_at = Utc::now();
                revision = next.revision;
                *current = Arc::new(next);
                true
            }
            None => false,
        });

        if changed {
            debug!(op, revision, "Store updated");
        } else {
            debug!(op, "Store operation was a no-op");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperiencePatch, ProjectPatch, SkillPatch};

    fn experience_patch(description: &str) -> EntryPatch {
        EntryPatch::Experience(ExperiencePatch {
            description: Some(description.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_initial_state() {
        let store = ResumeStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.zoom, DEFAULT_ZOOM);
        assert!(!snap.is_ai_open);
        assert_eq!(snap.revision, 0);
        assert_eq!(snap.document.template_id, "classic-midnight");
    }

    #[test]
    fn test_add_assigns_unique_ids_in_each_list() {
        let store = ResumeStore::new();
        let ids: Vec<EntryId> = (0..5).map(|_| store.add_entry(SectionKind::Skills)).collect();
        let doc = store.document();
        assert_eq!(doc.skills.ids(), ids);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 5);
    }

    #[test]
    fn test_add_update_remove_interleaved_across_ids() {
        let store = ResumeStore::new();
        let a = store.add_entry(SectionKind::Experience);
        let b = store.add_entry(SectionKind::Experience);
        let c = store.add_entry(SectionKind::Experience);

        store.update_entry(&b, &experience_patch("b1"));
        store.update_entry(&a, &experience_patch("a1"));
        store.remove_entry(SectionKind::Experience, &c);
        store.update_entry(&b, &experience_patch("b2"));
        let d = store.add_entry(SectionKind::Experience);
        store.update_entry(&d, &experience_patch("d1"));
        store.remove_entry(SectionKind::Experience, &a);

        let doc = store.document();
        let got: Vec<(EntryId, String)> = doc
            .experience
            .iter()
            .map(|e| (e.id.clone(), e.description.clone()))
            .collect();
        assert_eq!(got, vec![(b, "b2".to_string()), (d, "d1".to_string())]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let store = ResumeStore::new();
        store.add_entry(SectionKind::Experience);
        let before = store.snapshot();

        let changed = store.update_entry(&EntryId::from("nope"), &experience_patch("x"));
        assert!(!changed);

        let after = store.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.document.experience.len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let store = ResumeStore::new();
        store.add_entry(SectionKind::Projects);
        let before = store.document();
        assert!(!store.remove_entry(SectionKind::Projects, &EntryId::from("nope")));
        assert_eq!(*store.document(), *before);
    }

    #[test]
    fn test_patch_for_other_section_does_not_touch_entry() {
        let store = ResumeStore::new();
        let id = store.add_entry(SectionKind::Experience);
        let changed = store.update_entry(
            &id,
            &EntryPatch::Project(ProjectPatch {
                name: Some("x".to_string()),
                ..Default::default()
            }),
        );
        assert!(!changed, "project patch must not find an experience id");
    }

    #[test]
    fn test_empty_update_keeps_sibling_identity() {
        let store = ResumeStore::new();
        let a = store.add_entry(SectionKind::Skills);
        store.add_entry(SectionKind::Skills);
        let before = store.document();

        assert!(!store.update_entry(&a, &EntryPatch::Skill(SkillPatch::default())));

        let after = store.document();
        assert!(Arc::ptr_eq(
            before.skills.shared(1).unwrap(),
            after.skills.shared(1).unwrap()
        ));
    }

    #[test]
    fn test_update_shares_untouched_collections_and_siblings() {
        let store = ResumeStore::new();
        let a = store.add_entry(SectionKind::Experience);
        store.add_entry(SectionKind::Experience);
        store.add_entry(SectionKind::Education);
        let before = store.document();

        assert!(store.update_entry(&a, &experience_patch("new")));

        let after = store.document();
        assert!(after.education.ptr_eq(&before.education));
        assert!(!after.experience.ptr_eq(&before.experience));
        assert!(Arc::ptr_eq(
            before.experience.shared(1).unwrap(),
            after.experience.shared(1).unwrap()
        ));
        assert_eq!(before.experience.get(0).unwrap().description, "");
    }

    #[test]
    fn test_reorder_then_reverse_restores_order() {
        let store = ResumeStore::new();
        for _ in 0..4 {
            store.add_entry(SectionKind::Education);
        }
        let original = store.document().education.ids();
        assert!(store.reorder_entries(SectionKind::Education, 0, 3));
        assert_ne!(store.document().education.ids(), original);
        assert!(store.reorder_entries(SectionKind::Education, 3, 0));
        assert_eq!(store.document().education.ids(), original);
    }

    #[test]
    fn test_reorder_out_of_range_leaves_list_intact() {
        let store = ResumeStore::new();
        for _ in 0..3 {
            store.add_entry(SectionKind::Projects);
        }
        let original = store.document().projects.ids();
        assert!(!store.reorder_entries(SectionKind::Projects, 5, 0));
        assert!(!store.reorder_entries(SectionKind::Projects, 0, 7));
        assert_eq!(store.document().projects.ids(), original);
    }

    #[test]
    fn test_set_zoom_clamps() {
        let store = ResumeStore::new();
        assert_eq!(store.set_zoom(0.1), MIN_ZOOM);
        assert_eq!(store.set_zoom(9.0), MAX_ZOOM);
        assert_eq!(store.set_zoom(0.85), 0.85);
        assert_eq!(store.set_zoom(MIN_ZOOM), MIN_ZOOM);
        assert_eq!(store.set_zoom(f64::NAN), MIN_ZOOM, "NaN leaves zoom unchanged");
    }

    #[test]
    fn test_step_zoom_stops_at_bounds() {
        let store = ResumeStore::new();
        assert_eq!(store.step_zoom(1), 0.8);
        assert_eq!(store.step_zoom(20), MAX_ZOOM);
        assert_eq!(store.step_zoom(-50), MIN_ZOOM);
    }

    #[test]
    fn test_scalar_updates() {
        let store = ResumeStore::new();
        store.update_personal_info(&PersonalInfoPatch {
            full_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        });
        store.update_personal_info(&PersonalInfoPatch {
            job_title: Some("Engineer".to_string()),
            ..Default::default()
        });
        store.update_summary("Writes programs.");
        store.set_template("sidebar-emerald");
        store.apply_page_format(PageFormat::Letter);
        store.set_ai_open(true);

        let snap = store.snapshot();
        let doc = &snap.document;
        assert_eq!(doc.personal_info.full_name, "Ada Lovelace");
        assert_eq!(doc.personal_info.job_title, "Engineer");
        assert_eq!(doc.summary, "Writes programs.");
        assert_eq!(doc.template_id, "sidebar-emerald");
        assert_eq!(doc.page_settings.width, 215.9);
        assert!(snap.is_ai_open);
        assert_eq!(snap.revision, 6);
    }

    #[test]
    fn test_repeated_identical_update_does_not_bump_revision() {
        let store = ResumeStore::new();
        store.update_summary("same");
        let revision = store.snapshot().revision;
        assert!(!store.update_summary("same"));
        assert!(!store.set_ai_open(false));
        assert_eq!(store.snapshot().revision, revision);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ResumeStore::new();
        let other = store.clone();
        other.update_summary("shared");
        assert_eq!(store.document().summary, "shared");
    }

    #[tokio::test]
    async fn test_subscribers_are_notified_of_changes_only() {
        let store = ResumeStore::new();
        let mut rx = store.subscribe();

        store.update_summary("hello");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().document.summary, "hello");

        store.remove_entry(SectionKind::Skills, &EntryId::from("missing"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_all_applied() {
        let store = ResumeStore::new();
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    store.add_entry(SectionKind::Experience);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let snap = store.snapshot();
        assert_eq!(snap.document.experience.len(), 160);
        assert_eq!(snap.revision, 160);
    }
}
