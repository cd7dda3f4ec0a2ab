use serde::Serialize;

use crate::render::layout::LayoutId;
use crate::render::theme::ThemeId;

/// A layout + theme pair, addressed as `"<layout>-<theme>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId {
    pub layout: LayoutId,
    pub theme: ThemeId,
}

impl TemplateId {
    pub fn new(layout: LayoutId, theme: ThemeId) -> Self {
        Self { layout, theme }
    }

    /// Splits on the last hyphen, so `modern-minimal-rose` is layout `modern-minimal`
    /// with theme `rose`. Each half that is not recognised falls back on its own.
    pub fn parse(id: &str) -> Self {
        match id.rsplit_once('-') {
            Some((layout, theme)) => Self::new(LayoutId::parse(layout), ThemeId::parse(theme)),
            None => Self::new(LayoutId::parse(id), ThemeId::DEFAULT),
        }
    }

    pub fn key(&self) -> String {
        format!("{}-{}", self.layout.as_str(), self.theme.as_str())
    }
}

/// One selectable entry of the template gallery.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: &'static str,
    pub layout: LayoutId,
    pub theme: ThemeId,
    pub theme_color: &'static str,
    pub tags: [String; 2],
}

/// Every layout × theme combination, layout-major.
pub fn catalog() -> Vec<TemplateInfo> {
    LayoutId::ALL
        .iter()
        .flat_map(|&layout| {
            ThemeId::ALL.iter().map(move |&theme| TemplateInfo {
                id: TemplateId::new(layout, theme).key(),
                name: format!("{} - {}", layout.display_name(), theme.display_name()),
                description: layout.description(),
                layout,
                theme,
                theme_color: theme.palette().primary,
                tags: [
                    layout.as_str().to_uppercase(),
                    theme.display_name().to_uppercase(),
                ],
            })
        })
        .collect()
}
