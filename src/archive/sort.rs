//! Grouping archived jars into per-game-version folders.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use super::{ArchiveStore, jar_names};
use crate::utils::fs::{ensure_dir, move_file};
use crate::verify::{extract_with_fallback, guess_version_from_filename};

/// What happened to one archived jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    Moved {
        file: String,
        version: String,
    },
    /// A file with the same name already sits in the version folder.
    Skipped {
        file: String,
        version: String,
    },
    /// No game version could be read from the jar or its name.
    Undetermined {
        file: String,
    },
    Failed {
        file: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortReport {
    pub outcomes: Vec<SortOutcome>,
}

impl SortReport {
    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SortOutcome::Moved { .. })).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SortOutcome::Skipped { .. })).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SortOutcome::Undetermined { .. } | SortOutcome::Failed { .. }))
            .count()
    }
}

/// Game version for an archived jar: embedded metadata first, then the name.
fn detect_version(path: &Path, file_name: &str) -> Option<String> {
    extract_with_fallback(path).or_else(|| guess_version_from_filename(file_name))
}

impl ArchiveStore {
    /// Move each jar directly inside `.old/` into `.old/<game-version>/`.
    ///
    /// Jars whose version cannot be determined stay in place and count as
    /// failed, as do jars that could not be moved. Errors only when the
    /// archive directory does not exist.
    pub fn sort_by_version(&self) -> Result<SortReport> {
        if !self.old_dir.is_dir() {
            anyhow::bail!("{} does not exist", self.old_dir.display());
        }

        let mut report = SortReport::default();
        for file in jar_names(&self.old_dir) {
            let path = self.old_dir.join(&file);

            let Some(version) = detect_version(&path, &file) else {
                report.outcomes.push(SortOutcome::Undetermined {
                    file,
                });
                continue;
            };

            let version_dir = self.old_dir.join(&version);
            let target = version_dir.join(&file);
            if target.exists() {
                report.outcomes.push(SortOutcome::Skipped {
                    file,
                    version,
                });
                continue;
            }

            let moved = ensure_dir(&version_dir).and_then(|()| move_file(&path, &target));
            match moved {
                Ok(()) => {
                    debug!("Moved {} -> {}/", file, version);
                    report.outcomes.push(SortOutcome::Moved {
                        file,
                        version,
                    });
                }
                Err(e) => report.outcomes.push(SortOutcome::Failed {
                    file,
                    reason: format!("{e:#}"),
                }),
            }
        }

        Ok(report)
    }
}
