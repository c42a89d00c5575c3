//! Theme color triples.
//!
//! The profile record stores the triple as a JSON string field, so the
//! (de)serialization helpers here round-trip through `serde_json` rather than
//! embedding a nested object in the record.

use serde::{Deserialize, Serialize};

/// The three colors a theme is made of.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: String,
    pub accent: String,
    pub background: String,
}

impl ThemeColors {
    /// Serialize to the JSON string stored in the profile record.
    pub fn to_json(&self) -> String {
        // Serializing three string fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse the stored JSON string. Missing or unknown fields fall back to
    /// the defaults so an old record never breaks theme loading.
    pub fn from_json(raw: &str) -> Self {
        #[derive(Deserialize)]
        struct Partial {
            primary: Option<String>,
            accent: Option<String>,
            background: Option<String>,
        }

        let defaults = Self::default();
        match serde_json::from_str::<Partial>(raw) {
            Ok(p) => Self {
                primary: p.primary.unwrap_or(defaults.primary),
                accent: p.accent.unwrap_or(defaults.accent),
                background: p.background.unwrap_or(defaults.background),
            },
            Err(_) => defaults,
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#6366F1".into(),
            accent: "#8B5CF6".into(),
            background: "#0F0F23".into(),
        }
    }
}

/// A named preset offered by the theme customizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub primary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

impl ThemePreset {
    pub fn colors(&self) -> ThemeColors {
        ThemeColors {
            primary: self.primary.into(),
            accent: self.accent.into(),
            background: self.background.into(),
        }
    }
}

pub const THEME_PRESETS: [ThemePreset; 8] = [
    ThemePreset {
        name: "Voxen Default",
        primary: "#6366F1",
        accent: "#8B5CF6",
        background: "#0F0F23",
    },
    ThemePreset {
        name: "Ocean Blue",
        primary: "#0EA5E9",
        accent: "#06B6D4",
        background: "#0C1426",
    },
    ThemePreset {
        name: "Forest Green",
        primary: "#10B981",
        accent: "#34D399",
        background: "#0A1F1A",
    },
    ThemePreset {
        name: "Sunset Orange",
        primary: "#F97316",
        accent: "#FB923C",
        background: "#1F1611",
    },
    ThemePreset {
        name: "Royal Purple",
        primary: "#9333EA",
        accent: "#A855F7",
        background: "#1A0F2E",
    },
    ThemePreset {
        name: "Rose Pink",
        primary: "#E11D48",
        accent: "#F43F5E",
        background: "#2D0A14",
    },
    ThemePreset {
        name: "Midnight Dark",
        primary: "#6B7280",
        accent: "#9CA3AF",
        background: "#000000",
    },
    ThemePreset {
        name: "Arctic White",
        primary: "#1F2937",
        accent: "#374151",
        background: "#F9FAFB",
    },
];
