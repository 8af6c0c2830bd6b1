//! Latest-version report for every configured mod.

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use super::engine::{PrimaryLookup, UpdateEngine, unsupported_source_message};
use crate::manifest::{ModEntry, ModSource};
use crate::utils::progress::ProgressBar;

/// One row of the `modup list` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionStatus {
    pub id: String,
    pub name: String,
    pub source: String,
    pub slug: String,
    pub current_version: String,
    pub current_stability: String,
    pub latest_version: Option<String>,
    pub latest_stability: Option<String>,
    pub update_available: bool,
    pub error: Option<String>,
}

impl VersionStatus {
    fn from_entry(entry: &ModEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            source: entry.source.to_string(),
            slug: entry.slug.clone().unwrap_or_default(),
            current_version: entry.latest_version.clone().unwrap_or_else(|| "Unknown".into()),
            current_stability: entry.latest_stability.clone().unwrap_or_else(|| "Unknown".into()),
            latest_version: None,
            latest_stability: None,
            update_available: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub up_to_date: usize,
    pub updates_available: usize,
    pub errors: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[VersionStatus]) -> Self {
        let errors = rows.iter().filter(|r| r.error.is_some()).count();
        let updates_available =
            rows.iter().filter(|r| r.update_available && r.error.is_none()).count();
        Self {
            total: rows.len(),
            up_to_date: rows.len() - errors - updates_available,
            updates_available,
            errors,
        }
    }
}

fn not_found_message(source: &ModSource) -> String {
    match source {
        ModSource::Modrinth => "No compatible version found".to_string(),
        ModSource::GitHub => "No GitHub release found".to_string(),
        ModSource::GitLab => "No GitLab release found".to_string(),
        ModSource::Unsupported(raw) => unsupported_source_message(raw),
    }
}

fn missing_repository_message(source: &ModSource) -> String {
    match source {
        ModSource::GitLab => "No GitLab repo URL available".to_string(),
        _ => "No GitHub repo URL available".to_string(),
    }
}

/// Checks each mod's primary source for its newest compatible release.
///
/// Forks are not consulted: the report describes the configured upstream.
pub struct StatusChecker {
    engine: Arc<UpdateEngine>,
    batch_size: usize,
}

impl StatusChecker {
    pub fn new(engine: Arc<UpdateEngine>, batch_size: usize) -> Self {
        Self {
            engine,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn check(&self, entry: &ModEntry, minecraft_version: &str) -> VersionStatus {
        let mut status = VersionStatus::from_entry(entry);

        match self.engine.lookup_primary(entry, minecraft_version).await {
            PrimaryLookup::Resolved(Some(candidate)) => {
                status.update_available =
                    entry.latest_version.as_deref() != Some(candidate.version.as_str());
                status.latest_stability = Some(candidate.stability.to_string());
                status.latest_version = Some(candidate.version);
            }
            PrimaryLookup::Resolved(None) => status.error = Some(not_found_message(&entry.source)),
            PrimaryLookup::MissingRepository => {
                status.error = Some(missing_repository_message(&entry.source));
            }
            PrimaryLookup::Unsupported(raw) => {
                status.error = Some(unsupported_source_message(&raw));
            }
        }

        status
    }

    /// Rows for `mods` in the given order, checked in batches.
    pub async fn check_all(
        &self,
        mods: &[ModEntry],
        minecraft_version: &str,
        progress: Option<&ProgressBar>,
    ) -> Vec<VersionStatus> {
        let mut rows = Vec::with_capacity(mods.len());
        for batch in mods.chunks(self.batch_size) {
            let results =
                join_all(batch.iter().map(|entry| self.check(entry, minecraft_version))).await;
            if let Some(progress) = progress {
                progress.inc(results.len() as u64);
            }
            rows.extend(results);
        }
        rows
    }
}
