//! Closed set of layout strategies and the static blueprint each one renders with.

use serde::Serialize;

use crate::render::tree::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutId {
    Classic,
    Sidebar,
    Grid,
    Executive,
    Minimalist,
    Compact,
    Modern,
    Technical,
    Clean,
    Bold,
    Corporate,
    Developer,
    ModernMinimal,
    Entrepreneur,
}

impl LayoutId {
    /// The simplest single-column-first layout; used for unknown keys.
    pub const DEFAULT: LayoutId = LayoutId::Classic;

    pub const ALL: [LayoutId; 14] = [
        LayoutId::Classic,
        LayoutId::Sidebar,
        LayoutId::Grid,
        LayoutId::Executive,
        LayoutId::Minimalist,
        LayoutId::Compact,
        LayoutId::Modern,
        LayoutId::Technical,
        LayoutId::Clean,
        LayoutId::Bold,
        LayoutId::Corporate,
        LayoutId::Developer,
        LayoutId::ModernMinimal,
        LayoutId::Entrepreneur,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.as_str() == key)
    }

    pub fn parse(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutId::Classic => "classic",
            LayoutId::Sidebar => "sidebar",
            LayoutId::Grid => "grid",
            LayoutId::Executive => "executive",
            LayoutId::Minimalist => "minimalist",
            LayoutId::Compact => "compact",
            LayoutId::Modern => "modern",
            LayoutId::Technical => "technical",
            LayoutId::Clean => "clean",
            LayoutId::Bold => "bold",
            LayoutId::Corporate => "corporate",
            LayoutId::Developer => "developer",
            LayoutId::ModernMinimal => "modern-minimal",
            LayoutId::Entrepreneur => "entrepreneur",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutId::Classic => "Classic Professional",
            LayoutId::Sidebar => "Modern Sidebar",
            LayoutId::Grid => "Creative Grid",
            LayoutId::Executive => "Executive Suite",
            LayoutId::Minimalist => "Minimalist Mono",
            LayoutId::Compact => "Compact Professional",
            LayoutId::Modern => "Modern Dynamic",
            LayoutId::Technical => "Technical Monospace",
            LayoutId::Clean => "Clean Essential",
            LayoutId::Bold => "Bold Impact",
            LayoutId::Corporate => "Corporate Gold",
            LayoutId::Developer => "Dev Stack",
            LayoutId::ModernMinimal => "Modern Minimal",
            LayoutId::Entrepreneur => "Entrepreneur",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LayoutId::Classic => "A timeless, high-impact layout for any industry.",
            LayoutId::Sidebar => "Focused on contact details and professional visibility.",
            LayoutId::Grid => "Asymmetric design for creative and bold individuals.",
            LayoutId::Executive => "Premium layout for leadership and high-level roles.",
            LayoutId::Minimalist => "Clean, whitespace-focused design for high readability.",
            LayoutId::Compact => "Dense layout optimized for experienced professionals.",
            LayoutId::Modern => "Contemporary aesthetic with bold typography and shapes.",
            LayoutId::Technical => "Code-inspired layout for tech and engineering roles.",
            LayoutId::Clean => "Standard high-contrast design for maximum clarity.",
            LayoutId::Bold => "Large headers and high-energy design for attention.",
            LayoutId::Corporate => "A formal, structured layout for professional excellence.",
            LayoutId::Developer => "GitHub-inspired layout optimized for technical depth.",
            LayoutId::ModernMinimal => "Ultra-clean design with elegant spacing and typography.",
            LayoutId::Entrepreneur => "Focuses on vision and achievement with bold visuals.",
        }
    }

    pub fn blueprint(&self) -> Blueprint {
        use SectionId::*;

        match self {
            LayoutId::Classic => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Experience, Education, Projects],
                    aside: &[Summary, Skills],
                    side: Side::Right,
                    fill: AsideFill::Plain,
                },
                titles: Titles {
                    summary: "Profile",
                    experience: "Professional Experience",
                    education: "Education & Training",
                    skills: "Expertise",
                    projects: "Selected Projects",
                },
                ..Blueprint::base()
            },
            LayoutId::Sidebar => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Education, Skills],
                    side: Side::Left,
                    fill: AsideFill::Tinted,
                },
                titles: Titles {
                    skills: "Expertise",
                    ..Titles::plain()
                },
                show_photo: true,
                ..Blueprint::base()
            },
            LayoutId::Grid => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Skills, Education],
                    side: Side::Right,
                    fill: AsideFill::Tinted,
                },
                titles: Titles {
                    summary: "Career Narrative",
                    experience: "Milestones",
                    education: "Credentials",
                    skills: "Core Stack",
                    projects: "Showcase",
                },
                heading: HeadingStyle::Faded,
                show_photo: true,
                ..Blueprint::base()
            },
            LayoutId::Executive => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Education, Projects],
                    aside: &[Skills],
                    side: Side::Left,
                    fill: AsideFill::Filled,
                },
                titles: Titles {
                    summary: "Core Summary",
                    education: "Academic Path",
                    skills: "Top Skills",
                    projects: "Key Initiatives",
                    ..Titles::plain()
                },
                header: HeaderStyle::Banner,
                show_photo: true,
                ..Blueprint::base()
            },
            LayoutId::Minimalist => Blueprint {
                arrangement: Arrangement::Stacked(&[Summary, Experience, Skills, Education, Projects]),
                titles: Titles {
                    summary: "01_Profile",
                    experience: "02_History",
                    skills: "03_Tools",
                    education: "04_Edu",
                    projects: "05_Work",
                },
                heading: HeadingStyle::Rule,
                density: Density::Airy,
                ..Blueprint::base()
            },
            LayoutId::Compact => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Skills, Education],
                    side: Side::Right,
                    fill: AsideFill::Plain,
                },
                titles: Titles {
                    skills: "Expertise",
                    education: "Academic",
                    ..Titles::plain()
                },
                heading: HeadingStyle::Rule,
                density: Density::Compact,
                ..Blueprint::base()
            },
            LayoutId::Modern => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Skills, Education],
                    side: Side::Right,
                    fill: AsideFill::Tinted,
                },
                titles: Titles {
                    summary: "Summary_Matrix",
                    experience: "Career_Nodes",
                    skills: "Skill_Cluster",
                    projects: "Build_Log",
                    ..Titles::plain()
                },
                header: HeaderStyle::Banner,
                heading: HeadingStyle::Faded,
                show_photo: true,
                ..Blueprint::base()
            },
            LayoutId::Technical => Blueprint {
                arrangement: Arrangement::Stacked(&[Summary, Experience, Projects, Skills, Education]),
                titles: Titles {
                    summary: "/** @description Profile */",
                    experience: "/** @description Technical_Experience */",
                    education: "/** @description Education */",
                    skills: "/** @description Tech_Stack */",
                    projects: "/** @description Projects */",
                },
                font: FontFamily::Mono,
                surface: Surface::Dark,
                header: HeaderStyle::Code,
                heading: HeadingStyle::Code,
                ..Blueprint::base()
            },
            LayoutId::Clean => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Experience, Education, Projects],
                    aside: &[Summary, Skills],
                    side: Side::Left,
                    fill: AsideFill::Plain,
                },
                titles: Titles::plain(),
                header: HeaderStyle::Centered,
                ..Blueprint::base()
            },
            LayoutId::Bold => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Skills, Education],
                    side: Side::Right,
                    fill: AsideFill::Plain,
                },
                titles: Titles {
                    summary: "About",
                    ..Titles::plain()
                },
                header: HeaderStyle::Banner,
                heading: HeadingStyle::Large,
                density: Density::Airy,
                show_photo: true,
                ..Blueprint::base()
            },
            LayoutId::Corporate => Blueprint {
                arrangement: Arrangement::Stacked(&[Summary, Experience, Skills, Education, Projects]),
                titles: Titles {
                    summary: "Professional Profile",
                    skills: "Core Competencies",
                    ..Titles::plain()
                },
                header: HeaderStyle::Centered,
                ..Blueprint::base()
            },
            LayoutId::Developer => Blueprint {
                arrangement: Arrangement::Stacked(&[Summary, Experience, Projects, Skills, Education]),
                titles: Titles {
                    summary: "/ summary",
                    experience: "/ experience",
                    education: "/ education",
                    skills: "/ tech_stack",
                    projects: "/ repositories",
                },
                surface: Surface::Paper,
                heading: HeadingStyle::Code,
                ..Blueprint::base()
            },
            LayoutId::ModernMinimal => Blueprint {
                arrangement: Arrangement::Stacked(&[Summary, Experience, Skills, Education, Projects]),
                titles: Titles::plain(),
                surface: Surface::Ink,
                heading: HeadingStyle::Faded,
                density: Density::Airy,
                ..Blueprint::base()
            },
            LayoutId::Entrepreneur => Blueprint {
                arrangement: Arrangement::Columns {
                    main: &[Summary, Experience, Projects],
                    aside: &[Skills, Education],
                    side: Side::Right,
                    fill: AsideFill::Plain,
                },
                titles: Titles {
                    summary: "Vision",
                    experience: "Major Ventures",
                    skills: "Skillset",
                    projects: "Launches",
                    ..Titles::plain()
                },
                header: HeaderStyle::Banner,
                heading: HeadingStyle::Faded,
                show_photo: true,
                ..Blueprint::base()
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blueprint
// ────────────────────────────────────────────────────────────────────────────

/// Everything that distinguishes one layout from another. Section content itself is
/// built by the shared builders in `render::sections`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blueprint {
    pub arrangement: Arrangement,
    pub titles: Titles,
    pub font: FontFamily,
    pub surface: Surface,
    pub header: HeaderStyle,
    pub heading: HeadingStyle,
    pub density: Density,
    pub show_photo: bool,
}

impl Blueprint {
    fn base() -> Self {
        Self {
            arrangement: Arrangement::Stacked(&SectionId::ALL),
            titles: Titles::plain(),
            font: FontFamily::Sans,
            surface: Surface::Light,
            header: HeaderStyle::Left,
            heading: HeadingStyle::Underline,
            density: Density::Regular,
            show_photo: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// One column, sections in the given order.
    Stacked(&'static [SectionId]),
    /// A wide main column beside a narrow aside column.
    Columns {
        main: &'static [SectionId],
        aside: &'static [SectionId],
        side: Side,
        fill: AsideFill,
    },
}

impl Arrangement {
    /// Every section placed by this arrangement, main column first.
    #[cfg(test)]
    pub fn placed(&self) -> Vec<SectionId> {
        match self {
            Arrangement::Stacked(order) => order.to_vec(),
            Arrangement::Columns { main, aside, .. } => main.iter().chain(aside.iter()).copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsideFill {
    Plain,
    Tinted,
    /// Palette primary background with light text.
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Titles {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub projects: &'static str,
}

impl Titles {
    const fn plain() -> Self {
        Self {
            summary: "Summary",
            experience: "Experience",
            education: "Education",
            skills: "Skills",
            projects: "Projects",
        }
    }

    pub fn get(&self, section: SectionId) -> &'static str {
        match section {
            SectionId::Summary => self.summary,
            SectionId::Experience => self.experience,
            SectionId::Education => self.education,
            SectionId::Skills => self.skills,
            SectionId::Projects => self.projects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Mono,
}

impl FontFamily {
    pub fn css(&self) -> &'static str {
        match self {
            FontFamily::Sans => "'Inter', system-ui, -apple-system, sans-serif",
            FontFamily::Mono => "'JetBrains Mono', 'Fira Code', monospace",
        }
    }
}

/// Page background treatment. `Light` follows the theme; the others override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Light,
    Dark,
    Paper,
    Ink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    Left,
    Centered,
    /// Full-width band in the palette's primary color.
    Banner,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    Underline,
    /// Accent bar on the left edge.
    Rule,
    Faded,
    Large,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Compact,
    Regular,
    Airy,
}
