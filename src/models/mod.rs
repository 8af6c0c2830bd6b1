//! Shared data models for modup operations
//!
//! These types are produced by the release sources and the decision engine and
//! consumed by the CLI commands. None of them are persisted: the only durable
//! state is [`crate::manifest::ModsManifest`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::manifest::ModSource;

/// Release channel reported by an upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Alpha,
    Beta,
    #[default]
    Release,
}

impl Stability {
    /// Parse Modrinth's `version_type`. Unknown values are treated as releases.
    pub fn from_version_type(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "alpha" => Self::Alpha,
            "beta" => Self::Beta,
            _ => Self::Release,
        }
    }

    /// GitHub only exposes a prerelease flag.
    pub const fn from_prerelease(prerelease: bool) -> Self {
        if prerelease {
            Self::Beta
        } else {
            Self::Release
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata fetched alongside a Modrinth version.
///
/// Fields fall back to empty strings when the project lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Provenance {
    pub slug: String,
    pub project_name: String,
    pub source_url: String,
}

/// A normalized downloadable release, independent of where it came from.
///
/// Every constructed candidate points at a `.jar` artifact: sources only build
/// one after picking an asset whose name carries the archive suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCandidate {
    pub version: String,
    pub stability: Stability,
    pub file_url: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    /// Upstream-provided "already archived" marker. No source sets this today.
    #[serde(skip)]
    pub archived: bool,
}

impl ReleaseCandidate {
    pub fn new(
        version: impl Into<String>,
        stability: Stability,
        file_url: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            stability,
            file_url: file_url.into(),
            file_name: file_name.into(),
            provenance: None,
            archived: false,
        }
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}

/// What the caller should do with a mod after evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Skip,
    Simulate,
    Download,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Simulate => "simulate",
            Self::Download => "download",
        })
    }
}

/// The origin that produced a decision's candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionSource {
    Primary(ModSource),
    Fork,
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(source) => write!(f, "{source}"),
            Self::Fork => f.write_str("FORK"),
        }
    }
}

impl Serialize for DecisionSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Output of one [`crate::updater::UpdateEngine`] evaluation.
///
/// Created fresh per evaluation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateDecision {
    pub action: UpdateAction,
    pub source: DecisionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<ReleaseCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_url: Option<String>,
    /// Per-mod error such as an unsupported source. Never aborts the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateDecision {
    pub const fn skip(source: DecisionSource) -> Self {
        Self {
            action: UpdateAction::Skip,
            source,
            candidate: None,
            fork_url: None,
            error: None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.version.as_str())
    }

    pub fn stability(&self) -> Option<Stability> {
        self.candidate.as_ref().map(|c| c.stability)
    }

    pub fn file_url(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.file_url.as_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.file_name.as_str())
    }
}
