//! Cold storage for superseded mod files.
//!
//! Archived jars live in the `.old/` directory of the nearest folder named
//! `mods`, normally `<mods_dir>/.old/`. An archived file named
//! `{id}-{version}.jar` means that version of the mod was installed before and
//! must not be downloaded into the active set again automatically.
//!
//! # Layout
//!
//! ```text
//! mods/
//! ├── sodium-fabric-0.7.0+mc1.21.8.jar    active
//! └── .old/
//!     ├── sodium-fabric-0.6.0+mc1.21.6.jar
//!     └── 1.20.1/                          created by `modup sort`
//!         └── appleskin-1.20.1-2.5.1.jar
//! ```

mod similarity;
mod sort;

pub use similarity::name_similarity;
pub use sort::{SortOutcome, SortReport};

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::{ARCHIVE_SUFFIX, OLD_DIR_NAME, SIMILARITY_THRESHOLD};
use crate::core::ModupError;
use crate::source::is_archive_name;
use crate::utils::fs::{ensure_dir, move_file};
use crate::verify::old_dir_for;

/// The active mods directory and its `.old` archive.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    mods_dir: PathBuf,
    old_dir: PathBuf,
}

impl ArchiveStore {
    /// The archive is the `.old` directory of the nearest `mods` folder, the
    /// same place post-download verification moves mismatching jars to.
    /// Without such a folder it falls back to `<mods_dir>/.old`, and
    /// [`ArchiveStore::check_layout`] reports the problem.
    pub fn new(mods_dir: impl Into<PathBuf>) -> Self {
        let mods_dir = mods_dir.into();
        let old_dir = old_dir_for(&mods_dir).unwrap_or_else(|| mods_dir.join(OLD_DIR_NAME));
        Self {
            mods_dir,
            old_dir,
        }
    }

    /// Fails unless the mods directory sits under a folder named `mods`.
    ///
    /// Downloads are verified and archived relative to that folder, so a run
    /// that would download must check this first.
    pub fn check_layout(&self) -> Result<(), ModupError> {
        old_dir_for(&self.mods_dir).map(|_| ()).ok_or_else(|| ModupError::NoModsDirectory {
            path: self.mods_dir.display().to_string(),
        })
    }

    /// `file_name` inside the mods directory, if it is a bare jar name.
    pub fn active_path(&self, file_name: &str) -> Result<PathBuf, ModupError> {
        if !is_archive_name(file_name) {
            return Err(ModupError::UnsafeFileName {
                name: file_name.to_string(),
            });
        }
        Ok(self.mods_dir.join(file_name))
    }

    pub fn mods_dir(&self) -> &Path {
        &self.mods_dir
    }

    pub fn old_dir(&self) -> &Path {
        &self.old_dir
    }

    /// Create `mods/` and `mods/.old/` if missing.
    pub fn ensure_layout(&self) -> Result<()> {
        ensure_dir(&self.mods_dir)?;
        ensure_dir(&self.old_dir)
    }

    /// Whether `{id}-*{version}*.jar` exists directly inside the archive,
    /// ignoring archived files named in `skip`.
    ///
    /// A full run clears the mods folder into the archive first; those files
    /// were active a moment ago and must not block their own reinstall. A
    /// missing archive directory means nothing is archived.
    pub fn is_archived(&self, id: &str, version: &str, skip: &[String]) -> bool {
        if version.is_empty() {
            return false;
        }
        let prefix = format!("{id}-");
        jar_names(&self.old_dir).iter().any(|name| {
            name.starts_with(&prefix) && name.contains(version) && !skip.contains(name)
        })
    }

    /// Jar names directly inside the archive, sorted.
    pub fn list_archived(&self) -> Vec<String> {
        jar_names(&self.old_dir)
    }

    /// Jar names directly inside the mods directory, sorted.
    pub fn list_installed(&self) -> Vec<String> {
        jar_names(&self.mods_dir)
    }

    /// First installed `{id}-*.jar`, if any.
    pub fn installed_jar(&self, id: &str) -> Option<PathBuf> {
        let prefix = format!("{id}-");
        self.list_installed()
            .into_iter()
            .find(|name| name.starts_with(&prefix))
            .map(|name| self.mods_dir.join(name))
    }

    /// Installed `{id}-*.jar` files other than `new_file`.
    ///
    /// These are what a dry run reports as "would archive".
    pub fn superseded_files(&self, id: &str, new_file: &str) -> Vec<String> {
        let prefix = format!("{id}-");
        self.list_installed()
            .into_iter()
            .filter(|name| name.starts_with(&prefix) && name != new_file)
            .collect()
    }

    /// Move one file from the mods directory into the archive.
    pub fn archive_file(&self, file_name: &str) -> Result<PathBuf> {
        let from = self.mods_dir.join(file_name);
        let to = self.old_dir.join(file_name);
        move_file(&from, &to).map_err(|e| ModupError::ArchiveError {
            path: from.display().to_string(),
            reason: format!("{e:#}"),
        })?;
        debug!("Archived {}", file_name);
        Ok(to)
    }

    /// Move every installed jar into the archive, except `keep`.
    ///
    /// Used to clear the mods folder before a full update run.
    pub fn archive_all(&self, keep: Option<&str>) -> Result<Vec<String>> {
        let mut moved = Vec::new();
        for name in self.list_installed() {
            if Some(name.as_str()) == keep {
                continue;
            }
            self.archive_file(&name)?;
            moved.push(name);
        }
        Ok(moved)
    }

    /// Installed jars (other than `new_file`) whose names are at least
    /// [`SIMILARITY_THRESHOLD`] similar to `new_file`.
    pub fn similar_files(&self, new_file: &str) -> Vec<String> {
        self.list_installed()
            .into_iter()
            .filter(|name| {
                name != new_file && name_similarity(name, new_file) >= SIMILARITY_THRESHOLD
            })
            .collect()
    }

    /// Archive every file reported by [`ArchiveStore::similar_files`].
    pub fn archive_similar(&self, new_file: &str) -> Result<Vec<String>> {
        let similar = self.similar_files(new_file);
        for name in &similar {
            self.archive_file(name)?;
        }
        Ok(similar)
    }
}

/// Sorted names of `.jar` files directly inside `dir`. Empty if `dir` is missing.
fn jar_names(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(ARCHIVE_SUFFIX))
        .collect();
    names.sort();
    names
}
