//! The closed set of upstreams a mod entry can name.
//!
//! Aliases are normalised once here, while the config is deserialized, so the
//! rest of the crate matches on variants instead of strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Upstream a [`super::ModEntry`] is tracked against.
///
/// Accepts `MODRINTH`/`MR`, `GITHUB`/`GH` and `GITLAB`/`GL` case-insensitively.
/// Any other value is kept verbatim in [`ModSource::Unsupported`] so it can be
/// reported per mod and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModSource {
    Modrinth,
    GitHub,
    GitLab,
    Unsupported(String),
}

impl ModSource {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MODRINTH" | "MR" => Self::Modrinth,
            "GITHUB" | "GH" => Self::GitHub,
            "GITLAB" | "GL" => Self::GitLab,
            _ => Self::Unsupported(raw.to_string()),
        }
    }

    /// Canonical upper-case name, or the raw value for unsupported sources.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Modrinth => "MODRINTH",
            Self::GitHub => "GITHUB",
            Self::GitLab => "GITLAB",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Two-letter alias used by `modup list --filter`.
    pub const fn short_code(&self) -> Option<&'static str> {
        match self {
            Self::Modrinth => Some("MR"),
            Self::GitHub => Some("GH"),
            Self::GitLab => Some("GL"),
            Self::Unsupported(_) => None,
        }
    }

    /// An entry that names no source at all.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Unsupported(raw) if raw.is_empty())
    }
}

impl Default for ModSource {
    fn default() -> Self {
        Self::Unsupported(String::new())
    }
}

impl fmt::Display for ModSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
