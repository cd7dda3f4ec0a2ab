use serde::Serialize;

/// Color palette applied on top of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
    pub background: &'static str,
}

const MUTED: &str = "#64748b";
const BACKGROUND: &str = "#ffffff";

const fn palette(
    primary: &'static str,
    secondary: &'static str,
    accent: &'static str,
    border: &'static str,
) -> Palette {
    Palette {
        primary,
        secondary,
        accent,
        text: primary,
        muted: MUTED,
        border,
        background: BACKGROUND,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Midnight,
    Sapphire,
    Emerald,
    Ruby,
    Amber,
    Slate,
    Rose,
    Indigo,
    Forest,
    Crimson,
}

impl ThemeId {
    pub const DEFAULT: ThemeId = ThemeId::Midnight;

    pub const ALL: [ThemeId; 10] = [
        ThemeId::Midnight,
        ThemeId::Sapphire,
        ThemeId::Emerald,
        ThemeId::Ruby,
        ThemeId::Amber,
        ThemeId::Slate,
        ThemeId::Rose,
        ThemeId::Indigo,
        ThemeId::Forest,
        ThemeId::Crimson,
    ];

    /// Exact, case-sensitive lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == key)
    }

    /// Like `from_key`, but unknown keys resolve to [`ThemeId::DEFAULT`].
    pub fn parse(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Midnight => "midnight",
            ThemeId::Sapphire => "sapphire",
            ThemeId::Emerald => "emerald",
            ThemeId::Ruby => "ruby",
            ThemeId::Amber => "amber",
            ThemeId::Slate => "slate",
            ThemeId::Rose => "rose",
            ThemeId::Indigo => "indigo",
            ThemeId::Forest => "forest",
            ThemeId::Crimson => "crimson",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeId::Midnight => "Midnight",
            ThemeId::Sapphire => "Sapphire",
            ThemeId::Emerald => "Emerald",
            ThemeId::Ruby => "Ruby",
            ThemeId::Amber => "Amber",
            ThemeId::Slate => "Slate",
            ThemeId::Rose => "Rose",
            ThemeId::Indigo => "Indigo",
            ThemeId::Forest => "Forest",
            ThemeId::Crimson => "Crimson",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeId::Midnight => palette("#0f172a", "#1e293b", "#3b82f6", "#e2e8f0"),
            ThemeId::Sapphire => palette("#1e3a8a", "#1e40af", "#60a5fa", "#dbeafe"),
            ThemeId::Emerald => palette("#064e3b", "#065f46", "#34d399", "#d1fae5"),
            ThemeId::Ruby => palette("#991b1b", "#b91c1c", "#f87171", "#fee2e2"),
            ThemeId::Amber => palette("#92400e", "#b45309", "#fbbf24", "#fef3c7"),
            ThemeId::Slate => palette("#334155", "#475569", "#94a3b8", "#f1f5f9"),
            ThemeId::Rose => palette("#9f1239", "#be123c", "#fb7185", "#ffe4e6"),
            ThemeId::Indigo => palette("#3730a3", "#4338ca", "#818cf8", "#e0e7ff"),
            ThemeId::Forest => palette("#14532d", "#166534", "#4ade80", "#dcfce7"),
            ThemeId::Crimson => palette("#7f1d1d", "#991b1b", "#f87171", "#fee2e2"),
        }
    }
}
