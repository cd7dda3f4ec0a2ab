//! Shared formatting tokens: a blueprint's abstract choices resolved against a palette
//! into concrete style declarations. Every layout draws from the same token set.

use crate::render::layout::{
    Arrangement, AsideFill, Blueprint, Density, HeaderStyle, HeadingStyle, Surface,
};
use crate::render::theme::Palette;
use crate::render::tree::Style;

/// Resolved colors after the layout's surface is applied over the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub background: &'static str,
    pub text: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub rule: &'static str,
}

impl Ink {
    pub fn resolve(surface: Surface, palette: &Palette) -> Self {
        match surface {
            Surface::Light => Self {
                background: palette.background,
                text: palette.text,
                heading: palette.primary,
                muted: palette.muted,
                accent: palette.accent,
                rule: palette.border,
            },
            Surface::Dark => Self {
                background: "#0d1117",
                text: "#e6edf3",
                heading: palette.accent,
                muted: "#8b949e",
                accent: palette.accent,
                rule: "#30363d",
            },
            Surface::Paper => Self {
                background: "#fafafa",
                text: "#24292e",
                heading: palette.primary,
                muted: "#586069",
                accent: palette.accent,
                rule: "#e1e4e8",
            },
            Surface::Ink => Self {
                background: palette.background,
                text: "#111111",
                heading: "#111111",
                muted: palette.muted,
                accent: palette.accent,
                rule: palette.border,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tokens {
    pub ink: Ink,
    pub page: Style,
    pub header: Style,
    pub name: Style,
    pub job_title: Style,
    pub contact: Style,
    pub photo: Style,
    pub initials: Style,
    pub body: Style,
    pub main_column: Style,
    pub aside_column: Style,
    pub section: Style,
    pub heading: Style,
    pub entry: Style,
    pub entry_title: Style,
    pub entry_meta: Style,
    pub entry_body: Style,
    pub chip_list: Style,
    pub chip: Style,
    pub link: Style,
}

impl Tokens {
    pub fn resolve(blueprint: &Blueprint, palette: &Palette, margins: u32) -> Self {
        let ink = Ink::resolve(blueprint.surface, palette);
        let (section_gap, entry_gap, body_size) = match blueprint.density {
            Density::Compact => ("20px", "12px", "11px"),
            Density::Regular => ("40px", "24px", "13px"),
            Density::Airy => ("64px", "32px", "14px"),
        };

        let page = Style::new()
            .set("background", ink.background)
            .set("color", ink.text)
            .set("font-family", blueprint.font.css())
            .set("padding", format!("{margins}px"))
            .set("box-sizing", "border-box");

        let header = match blueprint.header {
            HeaderStyle::Left => Style::new().set("text-align", "left"),
            HeaderStyle::Centered => Style::new().set("text-align", "center"),
            HeaderStyle::Banner => Style::new()
                .set("background", palette.primary)
                .set("color", "#ffffff")
                .set("padding", "32px"),
            HeaderStyle::Code => Style::new()
                .set("border-bottom", format!("1px solid {}", ink.rule))
                .set("padding-bottom", "48px"),
        }
        .set("margin-bottom", section_gap);

        let on_banner = blueprint.header == HeaderStyle::Banner;
        let name = Style::new()
            .set("font-size", "48px")
            .set("font-weight", "900")
            .set("text-transform", "uppercase")
            .set("letter-spacing", "-0.04em")
            .set("color", if on_banner { "#ffffff" } else { ink.heading });
        let job_title = Style::new()
            .set("font-size", "16px")
            .set("font-weight", "700")
            .set("color", if on_banner { palette.accent } else { ink.accent });
        let contact = Style::new()
            .set("font-size", "11px")
            .set("color", if on_banner { palette.border } else { ink.muted });

        let heading = match blueprint.heading {
            HeadingStyle::Underline => Style::new()
                .set("font-size", "12px")
                .set("letter-spacing", "0.4em")
                .set("color", ink.heading)
                .set("border-bottom", format!("2px solid {}", ink.rule))
                .set("padding-bottom", "12px"),
            HeadingStyle::Rule => Style::new()
                .set("font-size", "12px")
                .set("letter-spacing", "0.5em")
                .set("border-left", format!("8px solid {}", ink.accent))
                .set("padding-left", "24px"),
            HeadingStyle::Faded => Style::new()
                .set("font-size", "10px")
                .set("letter-spacing", "0.5em")
                .set("opacity", "0.3"),
            HeadingStyle::Large => Style::new()
                .set("font-size", "36px")
                .set("letter-spacing", "-0.02em")
                .set("color", ink.heading),
            HeadingStyle::Code => Style::new()
                .set("font-size", "10px")
                .set("font-weight", "700")
                .set("color", ink.accent),
        }
        .set("text-transform", "uppercase")
        .set("margin-bottom", entry_gap);

        let aside_column = match aside_fill(blueprint) {
            AsideFill::Plain => Style::new(),
            AsideFill::Tinted => Style::new()
                .set("background", palette.border)
                .set("padding", "32px"),
            AsideFill::Filled => Style::new()
                .set("background", palette.primary)
                .set("color", "#ffffff")
                .set("padding", "32px"),
        }
        .set("flex", "1");

        Self {
            ink,
            page,
            header,
            name,
            job_title,
            contact,
            photo: Style::new()
                .set("width", "128px")
                .set("height", "128px")
                .set("object-fit", "cover"),
            initials: Style::new()
                .set("width", "128px")
                .set("height", "128px")
                .set("background", palette.primary)
                .set("color", "#ffffff")
                .set("font-size", "48px")
                .set("font-weight", "900"),
            body: Style::new().set("display", "flex").set("gap", section_gap),
            main_column: Style::new().set("flex", "2"),
            aside_column,
            section: Style::new().set("margin-bottom", section_gap),
            heading,
            entry: Style::new().set("margin-bottom", entry_gap),
            entry_title: Style::new()
                .set("font-size", "18px")
                .set("font-weight", "700")
                .set("color", ink.heading),
            entry_meta: Style::new()
                .set("font-size", "10px")
                .set("text-transform", "uppercase")
                .set("color", ink.muted),
            entry_body: Style::new()
                .set("font-size", body_size)
                .set("line-height", "1.6")
                .set("white-space", "pre-line")
                .set("color", ink.muted),
            chip_list: Style::new()
                .set("display", "flex")
                .set("flex-wrap", "wrap")
                .set("gap", "8px"),
            chip: Style::new()
                .set("border", format!("1px solid {}", ink.rule))
                .set("padding", "4px 10px")
                .set("font-size", "11px"),
            link: Style::new().set("color", ink.accent),
        }
    }
}

fn aside_fill(blueprint: &Blueprint) -> AsideFill {
    match blueprint.arrangement {
        Arrangement::Columns { fill, .. } => fill,
        Arrangement::Stacked(_) => AsideFill::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::LayoutId;
    use crate::render::theme::ThemeId;

    #[test]
    fn test_margins_become_page_padding() {
        let tokens = Tokens::resolve(
            &LayoutId::Classic.blueprint(),
            &ThemeId::Midnight.palette(),
            24,
        );
        assert_eq!(tokens.page.get("padding"), Some("24px"));
        assert_eq!(tokens.heading.get("color"), Some("#0f172a"));
    }

    #[test]
    fn test_dark_surface_overrides_theme_background() {
        let palette = ThemeId::Emerald.palette();
        let tokens = Tokens::resolve(&LayoutId::Technical.blueprint(), &palette, 40);
        assert_eq!(tokens.page.get("background"), Some("#0d1117"));
        assert_eq!(tokens.heading.get("color"), Some(palette.accent));
    }

    #[test]
    fn test_filled_aside_uses_primary() {
        let palette = ThemeId::Ruby.palette();
        let tokens = Tokens::resolve(&LayoutId::Executive.blueprint(), &palette, 40);
        assert_eq!(tokens.aside_column.get("background"), Some(palette.primary));
    }
}
