//! Core data types: [`Node`], the single outline entry, and [`Theme`], the
//! palette identifier that rides along in saved documents.
//!
//! A `Node` knows nothing about its neighbors. Hierarchy is not stored here:
//! a node's children are whatever happens to follow it at a deeper level in
//! the outline sequence (see [`crate::outline`]). The only structural datum a
//! node carries is its own `level`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One outline entry.
///
/// Deserialization is tolerant: only `content` and `level` are required, so
/// documents written by older builds (or hand-edited) load as long as the
/// core shape is intact. A missing id is replaced with a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub content: String,
    pub level: usize,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_linked: bool,
    #[serde(default)]
    pub is_task: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Node {
    /// Create a node from already-trimmed content. Empty-content rejection
    /// happens at the outline operation, not here.
    pub fn new(content: impl Into<String>, level: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            level,
            note: String::new(),
            is_linked: false,
            is_task: false,
            is_completed: false,
        }
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// Color theme identifier. The palette itself lives in the CLI layer; the
/// model only round-trips the name through saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Matcha,
    Latte,
    Ocean,
    Sunset,
    Midnight,
    Plum,
    Chess,
    Espresso,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Matcha
    }
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Matcha,
        Theme::Latte,
        Theme::Ocean,
        Theme::Sunset,
        Theme::Midnight,
        Theme::Plum,
        Theme::Chess,
        Theme::Espresso,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Matcha => "matcha",
            Theme::Latte => "latte",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
            Theme::Midnight => "midnight",
            Theme::Plum => "plum",
            Theme::Chess => "chess",
            Theme::Espresso => "espresso",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Theme::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Theme::from_name(&s.to_lowercase()).ok_or_else(|| {
            let names: Vec<&str> = Theme::ALL.iter().map(|t| t.name()).collect();
            format!("Unknown theme '{}'. Available: {}", s, names.join(", "))
        })
    }
}

// Saved documents may carry a theme name from a build with a different
// palette set. An unrecognized name falls back to the default rather than
// rejecting the whole document.
impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Theme::from_name(&name).unwrap_or_default())
    }
}
