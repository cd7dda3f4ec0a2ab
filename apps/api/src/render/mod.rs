//! Template Rendering Engine.
//!
//! `render` is a pure function of (document, layout, theme): it never mutates the
//! document and produces the same tree for the same input. Layouts differ only in
//! their `Blueprint`; the content of every section comes from `sections`.

pub mod bridge;
pub mod handlers;
pub mod layout;
pub mod sections;
pub mod template;
pub mod theme;
pub mod tokens;
pub mod tree;

use serde::Serialize;

use crate::models::{PageFormat, ResumeDocument};
use layout::{Arrangement, LayoutId, Side};
use template::TemplateId;
use theme::{Palette, ThemeId};
use tokens::Tokens;
use tree::{Node, Role};

/// DOM id of the element the PDF exporter captures.
pub const RENDER_TARGET_ID: &str = "resume-preview-root";

/// Physical page the tree is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFrame {
    pub format: PageFormat,
    pub width_mm: f64,
    pub height_mm: f64,
    pub margins_px: u32,
    pub crop_to_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub template_id: String,
    pub layout: LayoutId,
    pub theme: ThemeId,
    pub palette: Palette,
    pub page: PageFrame,
    pub root: Node,
}

/// Renders with the template named by the document's own `template_id`.
pub fn render_document(doc: &ResumeDocument) -> RenderedResume {
    let template = TemplateId::parse(&doc.template_id);
    render(doc, template.layout, template.theme)
}

pub fn render(doc: &ResumeDocument, layout: LayoutId, theme: ThemeId) -> RenderedResume {
    let blueprint = layout.blueprint();
    let palette = theme.palette();
    let settings = &doc.page_settings;
    let tokens = Tokens::resolve(&blueprint, &palette, settings.margins);

    let body = match blueprint.arrangement {
        Arrangement::Stacked(order) => Node::element(
            "main",
            tree::Style::new(),
            sections::sections(doc, order, &blueprint, &tokens),
        ),
        Arrangement::Columns {
            main, aside, side, ..
        } => {
            let main = Node::with_role(
                "main",
                Role::Column { name: "main" },
                tokens.main_column.clone(),
                sections::sections(doc, main, &blueprint, &tokens),
            );
            let aside = Node::with_role(
                "aside",
                Role::Column { name: "aside" },
                tokens.aside_column.clone(),
                sections::sections(doc, aside, &blueprint, &tokens),
            );
            let columns = match side {
                Side::Left => vec![aside, main],
                Side::Right => vec![main, aside],
            };
            Node::element("div", tokens.body.clone(), columns)
        }
    };

    let mut page_style = tokens
        .page
        .clone()
        .set("width", format!("{}mm", settings.width));
    if !settings.crop_to_content {
        page_style = page_style.set("min-height", format!("{}mm", settings.height));
    }

    let root = Node::with_role(
        "div",
        Role::Page,
        page_style,
        vec![sections::header(doc, &blueprint, &tokens), body],
    );

    RenderedResume {
        template_id: TemplateId::new(layout, theme).key(),
        layout,
        theme,
        palette,
        page: PageFrame {
            format: settings.format,
            width_mm: settings.width,
            height_mm: settings.height,
            margins_px: settings.margins,
            crop_to_content: settings.crop_to_content,
        },
        root,
    }
}

impl RenderedResume {
    /// Standalone HTML page holding the tree inside the export target element.
    pub fn to_html_document(&self, title: &str) -> String {
        let page_size = if self.page.crop_to_content {
            format!("{}mm auto", self.page.width_mm)
        } else {
            format!("{}mm {}mm", self.page.width_mm, self.page.height_mm)
        };
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
             <style>@page{{size:{};margin:0}}body{{margin:0}}</style></head>\
             <body><div id=\"{}\">{}</div></body></html>",
            tree::escape(title),
            page_size,
            RENDER_TARGET_ID,
            self.root.to_html()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EducationPatch, EntryPatch, ExperiencePatch, PersonalInfoPatch, SectionKind,
    };
    use crate::render::tree::SectionId;
    use crate::store::ResumeStore;

    fn headings(rendered: &RenderedResume, section: SectionId) -> usize {
        rendered
            .root
            .find_all(|r| *r == Role::SectionHeading { section })
            .len()
    }

    fn entry_ids(rendered: &RenderedResume, kind: SectionKind) -> Vec<String> {
        rendered
            .root
            .find_all(|r| matches!(r, Role::Entry { section, .. } if *section == kind))
            .into_iter()
            .filter_map(|n| match n.role() {
                Some(Role::Entry { id, .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect()
    }

    fn populated_store() -> ResumeStore {
        let store = ResumeStore::new();
        store.update_personal_info(&PersonalInfoPatch {
            full_name: Some("Grace Hopper".to_string()),
            job_title: Some("Rear Admiral".to_string()),
            ..Default::default()
        });
        store.update_summary("Compiler pioneer.");
        let exp = store.add_entry(SectionKind::Experience);
        store.update_entry(
            &exp,
            &EntryPatch::Experience(ExperiencePatch {
                position: Some("Programmer".to_string()),
                current: Some(true),
                ..Default::default()
            }),
        );
        store.add_entry(SectionKind::Skills);
        store.add_entry(SectionKind::Projects);
        store
    }

    #[test]
    fn test_empty_education_emits_no_heading_in_any_layout() {
        let store = populated_store();
        let doc = store.document();
        for layout in LayoutId::ALL {
            let rendered = render(&doc, layout, ThemeId::Slate);
            assert_eq!(
                headings(&rendered, SectionId::Education),
                0,
                "layout {}",
                layout.as_str()
            );
            assert_eq!(headings(&rendered, SectionId::Experience), 1);
        }
    }

    #[test]
    fn test_education_entries_render_once_each_in_order() {
        let store = populated_store();
        let mut ids = Vec::new();
        for school in ["MIT", "Yale", "Vassar"] {
            let id = store.add_entry(SectionKind::Education);
            store.update_entry(
                &id,
                &EntryPatch::Education(EducationPatch {
                    school: Some(school.to_string()),
                    ..Default::default()
                }),
            );
            ids.push(id.to_string());
        }
        store.reorder_entries(SectionKind::Education, 2, 0);
        let expected: Vec<String> = store
            .document()
            .education
            .ids()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_ne!(expected, ids);

        let doc = store.document();
        for layout in LayoutId::ALL {
            let rendered = render(&doc, layout, ThemeId::Indigo);
            assert_eq!(headings(&rendered, SectionId::Education), 1);
            assert_eq!(entry_ids(&rendered, SectionKind::Education), expected);
        }
    }

    #[test]
    fn test_blank_summary_is_omitted() {
        let store = populated_store();
        store.update_summary("   ");
        let rendered = render_document(&store.document());
        assert_eq!(headings(&rendered, SectionId::Summary), 0);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = populated_store().document();
        for layout in LayoutId::ALL {
            let a = render(&doc, layout, ThemeId::Amber);
            let b = render(&doc, layout, ThemeId::Amber);
            assert_eq!(a, b);
            assert_eq!(
                serde_json::to_vec(&a).unwrap(),
                serde_json::to_vec(&b).unwrap()
            );
            assert_eq!(a.root.to_html(), b.root.to_html());
        }
    }

    #[test]
    fn test_unknown_template_renders_fallback() {
        let store = populated_store();
        store.set_template("hologram-neon");
        let doc = store.document();
        let rendered = render_document(&doc);
        assert_eq!(rendered, render(&doc, LayoutId::Classic, ThemeId::Midnight));
        assert_eq!(rendered.template_id, "classic-midnight");
    }

    #[test]
    fn test_render_does_not_touch_document() {
        let store = populated_store();
        let before = store.snapshot();
        let _ = render_document(&store.document());
        assert!(std::sync::Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_current_role_shows_present() {
        let rendered = render_document(&populated_store().document());
        assert!(rendered.root.to_html().contains("Present"));
    }

    #[test]
    fn test_move_controls_follow_position() {
        let store = populated_store();
        store.add_entry(SectionKind::Projects);
        let rendered = render_document(&store.document());
        let controls: Vec<_> = rendered
            .root
            .find_all(|r| matches!(r, Role::Entry { section: SectionKind::Projects, .. }))
            .into_iter()
            .filter_map(|n| match n.role() {
                Some(Role::Entry { controls, .. }) => Some(*controls),
                _ => None,
            })
            .collect();
        assert_eq!(controls.len(), 2);
        assert!(controls[0].move_up.is_none() && controls[0].move_down.is_some());
        assert!(controls[1].move_up.is_some() && controls[1].move_down.is_none());
    }

    #[test]
    fn test_photo_layouts_show_image_or_initials() {
        let store = populated_store();
        let doc = store.document();
        let html = render(&doc, LayoutId::Sidebar, ThemeId::Rose).root.to_html();
        assert!(html.contains(">GH</div>"));
        assert!(!html.contains("<img"));

        store.set_profile_photo("https://example.com/grace.jpg".to_string());
        let doc = store.document();
        let html = render(&doc, LayoutId::Sidebar, ThemeId::Rose).root.to_html();
        assert!(html.contains("<img src=\"https://example.com/grace.jpg\""));
        let classic = render(&doc, LayoutId::Classic, ThemeId::Rose).root.to_html();
        assert!(!classic.contains("<img"));
    }

    #[test]
    fn test_page_frame_and_html_document() {
        let store = populated_store();
        store.resize_page(180.0, 250.0);
        let rendered = render_document(&store.document());
        assert_eq!(rendered.page.format, PageFormat::Custom);
        assert_eq!(rendered.page.width_mm, 180.0);
        let html = rendered.to_html_document("Grace <Hopper>");
        assert!(html.contains("<div id=\"resume-preview-root\">"));
        assert!(html.contains("size:180mm 250mm"));
        assert!(html.contains("<title>Grace &lt;Hopper&gt;</title>"));
    }

    #[test]
    fn test_margins_drive_page_padding() {
        let store = populated_store();
        store.update_page_settings(&crate::models::PageSettingsPatch {
            margins: Some(12),
            ..Default::default()
        });
        let rendered = render_document(&store.document());
        assert!(rendered.root.to_html().contains("padding:12px"));
    }
}
