//! Batch evaluation and the download → verify → commit pipeline.

use anyhow::Result;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::engine::{DecisionOptions, UpdateEngine};
use crate::archive::ArchiveStore;
use crate::http::HttpClient;
use crate::manifest::{ModEntry, ModsManifest};
use crate::models::{UpdateAction, UpdateDecision};
use crate::verify::{extract_embedded_version, validate_or_archive};

/// Flags for one `modup update` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    pub decision: DecisionOptions,
    /// Archive only files similar to the new one instead of clearing the folder.
    pub picky: bool,
    /// Restrict the run to the mod matching this id, name or slug.
    pub only: Option<String>,
}

/// What the pipeline did with one mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModOutcome {
    NoUpdate {
        /// Game version embedded in the currently installed `{id}-*.jar`.
        installed_minecraft_version: Option<String>,
        /// Forks consulted before falling back to the primary source.
        checked_forks: Vec<String>,
    },
    /// Unsupported source or similar per-mod error.
    Error(String),
    /// Dry run: what would be archived and downloaded.
    WouldDownload {
        superseded: Vec<String>,
    },
    /// This version was archived before; not downloaded again.
    AlreadyArchived,
    Updated {
        path: PathBuf,
        archived: Vec<String>,
    },
    /// Downloaded, but the jar targets another game version; moved to `.old`.
    VersionMismatch {
        expected_version: String,
        found_version: Option<String>,
        archived_path: Option<PathBuf>,
    },
    DownloadFailed(String),
    /// Config-only run: installed file verified and recorded.
    ConfigRefreshed,
    /// Config-only run: nothing verifiable installed for this candidate.
    ConfigUnchanged,
}

#[derive(Debug, Clone)]
pub struct ModReport {
    pub id: String,
    pub name: String,
    pub decision: UpdateDecision,
    pub outcome: ModOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ids whose `latest_version` was committed, in config order.
    pub committed: Vec<String>,
    /// Jars moved out of the way before the batch started.
    pub cleared: Vec<String>,
    /// Whether any mod had an update (downloaded, or would be in a dry run).
    pub any_update: bool,
}

impl RunSummary {
    pub fn config_changed(&self) -> bool {
        !self.committed.is_empty()
    }
}

/// Drives an [`UpdateEngine`] over a whole config.
///
/// Decisions are computed concurrently in ordered batches of `batch_size`.
/// Side effects (downloads, archival, config commits) run afterwards one mod
/// at a time, in config order, on the calling task.
pub struct UpdateRunner {
    engine: Arc<UpdateEngine>,
    http: Arc<HttpClient>,
    store: ArchiveStore,
    batch_size: usize,
}

impl UpdateRunner {
    pub fn new(
        engine: Arc<UpdateEngine>,
        http: Arc<HttpClient>,
        store: ArchiveStore,
        batch_size: usize,
    ) -> Self {
        Self {
            engine,
            http,
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Decisions for `mods`, same order, at most `batch_size` in flight.
    pub async fn evaluate(
        &self,
        mods: &[ModEntry],
        options: &DecisionOptions,
    ) -> Vec<UpdateDecision> {
        let mut decisions = Vec::with_capacity(mods.len());
        for batch in mods.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|m| self.engine.decide(m, options))).await;
            decisions.extend(results);
        }
        decisions
    }

    /// Run an update over `manifest`, calling `report` once per mod as soon as
    /// that mod is done.
    ///
    /// `manifest` is only mutated through [`ModsManifest::commit_update`]
    /// after a file verified against the target version. Saving is left to
    /// the caller.
    pub async fn run<F>(
        &self,
        manifest: &mut ModsManifest,
        options: &UpdateOptions,
        mut report: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&ModReport),
    {
        let entries: Vec<ModEntry> = match &options.only {
            Some(query) => vec![manifest.find_mod(query)?.clone()],
            None => manifest.mods.clone(),
        };

        let mut summary = RunSummary::default();
        let decision_options = &options.decision;
        if !decision_options.is_simulating() {
            // Verification archives relative to a `mods` folder; fail before
            // anything is downloaded if there is none
            self.store.check_layout()?;
            self.store.ensure_layout()?;
        }
        if options.only.is_none() && !options.picky && !decision_options.is_simulating() {
            summary.cleared = self.store.archive_all(None)?;
            if !summary.cleared.is_empty() {
                info!("Archived {} existing mod files", summary.cleared.len());
            }
        }

        for batch in entries.chunks(self.batch_size) {
            let decisions = self.evaluate(batch, decision_options).await;

            for (entry, decision) in batch.iter().zip(decisions) {
                let outcome = self.apply(entry, &decision, options, &summary.cleared).await;

                match &outcome {
                    ModOutcome::Updated { .. } | ModOutcome::ConfigRefreshed => {
                        manifest.commit_update(&entry.id, &decision)?;
                        summary.committed.push(entry.id.clone());
                        summary.any_update = true;
                    }
                    ModOutcome::WouldDownload { .. } => summary.any_update = true,
                    _ => {}
                }

                report(&ModReport {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    decision,
                    outcome,
                });
            }
        }

        Ok(summary)
    }

    async fn apply(
        &self,
        entry: &ModEntry,
        decision: &UpdateDecision,
        options: &UpdateOptions,
        cleared: &[String],
    ) -> ModOutcome {
        if let Some(error) = &decision.error {
            return ModOutcome::Error(error.clone());
        }

        let Some(candidate) = decision.candidate.as_ref() else {
            return self.no_update(entry);
        };

        match decision.action {
            UpdateAction::Skip => self.no_update(entry),
            UpdateAction::Simulate if options.decision.dry_run => ModOutcome::WouldDownload {
                superseded: self.store.superseded_files(&entry.id, &candidate.file_name),
            },
            UpdateAction::Simulate => {
                // Config-only: record the candidate only if it is already
                // installed and verifies
                let verified = self.store.active_path(&candidate.file_name).is_ok_and(|path| {
                    path.is_file()
                        && extract_embedded_version(&path).as_deref()
                            == Some(options.decision.minecraft_version.as_str())
                });
                if verified { ModOutcome::ConfigRefreshed } else { ModOutcome::ConfigUnchanged }
            }
            UpdateAction::Download => self.download(entry, decision, options, cleared).await,
        }
    }

    async fn download(
        &self,
        entry: &ModEntry,
        decision: &UpdateDecision,
        options: &UpdateOptions,
        cleared: &[String],
    ) -> ModOutcome {
        let Some(candidate) = decision.candidate.as_ref() else {
            return self.no_update(entry);
        };

        // Files cleared at the start of this run were active, not retired
        if self.store.is_archived(&entry.id, &candidate.version, cleared) {
            debug!("{} {} is archived, not downloading again", entry.id, candidate.version);
            return ModOutcome::AlreadyArchived;
        }

        let path = match self.store.active_path(&candidate.file_name) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping {}: {}", entry.id, e);
                return ModOutcome::DownloadFailed(e.to_string());
            }
        };

        let archived = if options.picky {
            match self.store.archive_similar(&candidate.file_name) {
                Ok(archived) => archived,
                Err(e) => return ModOutcome::DownloadFailed(format!("{e:#}")),
            }
        } else {
            Vec::new()
        };

        if let Err(e) = self.http.download_to_file(&candidate.file_url, &path).await {
            warn!("Download of {} failed: {:#}", candidate.file_url, e);
            return ModOutcome::DownloadFailed(format!("{e:#}"));
        }

        match validate_or_archive(&path, &options.decision.minecraft_version) {
            Ok(validation) if validation.valid => ModOutcome::Updated {
                path,
                archived,
            },
            Ok(validation) => ModOutcome::VersionMismatch {
                expected_version: options.decision.minecraft_version.clone(),
                found_version: validation.found_version,
                archived_path: validation.archived_path,
            },
            Err(e) => ModOutcome::DownloadFailed(format!("{e:#}")),
        }
    }

    fn no_update(&self, entry: &ModEntry) -> ModOutcome {
        ModOutcome::NoUpdate {
            installed_minecraft_version: self
                .store
                .installed_jar(&entry.id)
                .and_then(|path| extract_embedded_version(&path)),
            checked_forks: entry.forks.clone(),
        }
    }
}
