//! The persisted mods configuration (`mods_config.json`).
//!
//! The file is a JSON document shaped `{ "mods": [ ... ] }`. Each entry names a
//! project on one upstream plus the version that was last downloaded and
//! verified:
//!
//! ```json
//! {
//!   "mods": [
//!     {
//!       "id": "AANobbMI",
//!       "name": "Sodium",
//!       "slug": "sodium",
//!       "source": "MODRINTH",
//!       "latest_version": "mc1.21.8-0.7.0-fabric",
//!       "latest_stability": "release"
//!     },
//!     {
//!       "id": "carpet",
//!       "name": "Carpet",
//!       "source": "GH",
//!       "fallback_repo": "https://github.com/gnembon/fabric-carpet",
//!       "forks": ["https://github.com/someone/fabric-carpet"]
//!     }
//!   ]
//! }
//! ```
//!
//! # Mutation rules
//!
//! [`ModsManifest`] is only mutated through [`ModsManifest::commit_update`]
//! (after a verified download) and [`ModsManifest::add_fork`]. Keys this crate
//! does not know about are carried through a load/save cycle untouched.

mod source;


pub use source::ModSource;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::core::ModupError;
use crate::models::UpdateDecision;
use crate::utils::fs::atomic_write;

/// One configured mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModEntry {
    /// Source-specific project identifier, unique within the config.
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Entries without a source load as unsupported and are reported per mod.
    #[serde(default, skip_serializing_if = "ModSource::is_missing")]
    pub source: ModSource,

    /// Repository URL used for GitHub and GitLab entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_repo: Option<String>,

    /// Alternative GitHub repositories, highest priority first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_stability: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// The alias spelling the file used for `source` (`"gh"`), written back
    /// on save while it still names the same source.
    #[serde(skip)]
    source_alias: Option<String>,
}

impl ModEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: ModSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            source,
            fallback_repo: None,
            forks: Vec::new(),
            latest_version: None,
            latest_stability: None,
            extra: Map::new(),
            source_alias: None,
        }
    }

    /// Whether `query` names this mod by id, case-insensitive name, or slug.
    pub fn matches(&self, query: &str) -> bool {
        self.id == query
            || self.name.to_lowercase() == query.to_lowercase()
            || self.slug.as_deref() == Some(query)
    }
}

/// The `{ mods: [...] }` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModsManifest {
    #[serde(default)]
    pub mods: Vec<ModEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModsManifest {
    /// Load the mods config from `path`.
    ///
    /// A missing file is a [`ModupError::ConfigNotFound`]; invalid JSON is a
    /// [`ModupError::ManifestParseError`]. Both halt the run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModupError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mods config: {}", path.display()))?;

        let parse_error = |e: serde_json::Error| ModupError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        let raw: Value = serde_json::from_str(&content).map_err(parse_error)?;
        let mut manifest: Self = serde_json::from_value(raw.clone()).map_err(parse_error)?;
        manifest.remember_source_aliases(&raw);

        debug!("Loaded {} mods from {}", manifest.mods.len(), path.display());
        Ok(manifest)
    }

    /// Write the config back with two-space indentation, atomically.
    ///
    /// `source` keeps the spelling it was loaded with.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut value = serde_json::to_value(self).context("Failed to serialize mods config")?;
        self.restore_source_aliases(&mut value);
        let mut content =
            serde_json::to_string_pretty(&value).context("Failed to serialize mods config")?;
        content.push('\n');
        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Failed to write mods config: {}", path.display()))
    }

    fn remember_source_aliases(&mut self, raw: &Value) {
        let Some(raw_mods) = raw.get("mods").and_then(Value::as_array) else {
            return;
        };
        for (entry, raw_entry) in self.mods.iter_mut().zip(raw_mods) {
            entry.source_alias = raw_entry
                .get("source")
                .and_then(Value::as_str)
                .filter(|spelling| *spelling != entry.source.as_str())
                .map(str::to_string);
        }
    }

    fn restore_source_aliases(&self, value: &mut Value) {
        let Some(raw_mods) = value.get_mut("mods").and_then(Value::as_array_mut) else {
            return;
        };
        for (entry, raw_entry) in self.mods.iter().zip(raw_mods) {
            if let Some(alias) = &entry.source_alias
                && ModSource::parse(alias) == entry.source
            {
                raw_entry["source"] = Value::String(alias.clone());
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ModEntry> {
        self.mods.iter().find(|m| m.id == id)
    }

    /// Look a mod up by id, case-insensitive display name, or slug.
    pub fn find_mod(&self, query: &str) -> Result<&ModEntry, ModupError> {
        self.mods.iter().find(|m| m.matches(query)).ok_or_else(|| ModupError::ModNotFound {
            query: query.to_string(),
        })
    }

    /// Record a verified download as the mod's latest known-good version.
    ///
    /// This is the only place `latest_version` is written. Callers must only
    /// invoke it once the downloaded file has passed verification.
    pub fn commit_update(&mut self, id: &str, decision: &UpdateDecision) -> Result<(), ModupError> {
        let entry = self.mods.iter_mut().find(|m| m.id == id).ok_or_else(|| {
            ModupError::ModNotFound {
                query: id.to_string(),
            }
        })?;

        if let Some(candidate) = &decision.candidate {
            if !candidate.version.is_empty() {
                entry.latest_version = Some(candidate.version.clone());
            }
            entry.latest_stability = Some(candidate.stability.to_string());
        }

        debug!("Committed {} -> {:?}", id, entry.latest_version);
        Ok(())
    }

    /// Append `fork_url` to the mod's fork list.
    ///
    /// Returns `false` when the URL was already present.
    pub fn add_fork(&mut self, id: &str, fork_url: &str) -> Result<bool, ModupError> {
        let entry = self.mods.iter_mut().find(|m| m.id == id).ok_or_else(|| {
            ModupError::ModNotFound {
                query: id.to_string(),
            }
        })?;

        if entry.forks.iter().any(|f| f == fork_url) {
            return Ok(false);
        }
        entry.forks.push(fork_url.to_string());
        Ok(true)
    }

    /// Guess which mod a fork repository belongs to from its repository name.
    ///
    /// Compares the last path segment of the URL (without `.git`) against each
    /// mod's id, slug and name, ignoring case, `-`, `_` and spaces.
    pub fn infer_mod_for_fork(&self, fork_url: &str) -> Option<&ModEntry> {
        let repo_name = fork_url
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .map(|segment| segment.trim_end_matches(".git"))
            .filter(|segment| !segment.is_empty())?;
        let wanted = normalize_name(repo_name);

        self.mods.iter().find(|m| {
            normalize_name(&m.id) == wanted
                || m.slug.as_deref().is_some_and(|s| normalize_name(s) == wanted)
                || normalize_name(&m.name) == wanted
        })
    }
}

fn normalize_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
