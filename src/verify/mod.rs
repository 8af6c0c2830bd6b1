//! Post-download verification of a mod jar's target game version.
//!
//! A jar built with Fabric Loom records the game version it was compiled
//! against in `META-INF/MANIFEST.MF`:
//!
//! ```text
//! Fabric-Minecraft-Version: 1.21.8-rc1
//! ```
//!
//! [`extract_embedded_version`] reads that line and reduces it to a
//! `MAJOR.MINOR.PATCH` base version (`1.21.8`). [`validate_or_archive`] compares
//! it with the expected version and moves mismatching files into the `.old`
//! directory of the enclosing `mods` folder.
//!
//! An unreadable jar, a missing manifest, a missing line or an unparsable
//! token all yield `None`: the version is unknown, which callers treat as a
//! mismatch.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{
    FABRIC_MOD_JSON_ENTRY, MANIFEST_ENTRY, MINECRAFT_VERSION_KEY, MODS_DIR_NAME, OLD_DIR_NAME,
};
use crate::core::ModupError;
use crate::utils::fs::move_file;

/// Result of [`validate_or_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub found_version: Option<String>,
    /// Where the file was moved when it did not match.
    pub archived_path: Option<PathBuf>,
}

/// Read a single entry of a zip archive as text. `Ok(None)` if absent.
fn read_entry(path: &Path, entry: &str) -> Result<Option<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid jar", path.display()))?;

    let mut zipped = match archive.by_name(entry) {
        Ok(zipped) => zipped,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {entry}")),
    };

    let mut bytes = Vec::new();
    zipped.read_to_end(&mut bytes).with_context(|| format!("Failed to read {entry}"))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Parse a `Fabric-Minecraft-Version:` manifest line into a base version.
///
/// `Fabric-Minecraft-Version: 1.21.8-rc1` yields `1.21.8`; anything that does
/// not start with `1.<1-2 digits>.<1-2 digits>` yields `None`.
pub fn parse_version_line(line: &str) -> Option<String> {
    let line_re = Regex::new(r"^Fabric-Minecraft-Version:\s*(\S+)").ok()?;
    let base_re = Regex::new(r"^(1\.\d{1,2}\.\d{1,2})").ok()?;

    let token = line_re.captures(line)?.get(1)?.as_str().trim();
    match base_re.captures(token).and_then(|c| c.get(1)) {
        Some(base) => Some(base.as_str().to_string()),
        None => {
            debug!("Invalid Minecraft version format: {}", token);
            None
        }
    }
}

/// Game version embedded in the jar's manifest, normalised to `MAJOR.MINOR.PATCH`.
pub fn extract_embedded_version(path: &Path) -> Option<String> {
    let manifest = match read_entry(path, MANIFEST_ENTRY) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => {
            debug!("{} has no {}", path.display(), MANIFEST_ENTRY);
            return None;
        }
        Err(e) => {
            warn!("Could not read {}: {:#}", path.display(), e);
            return None;
        }
    };

    manifest
        .split('\n')
        .find(|line| line.starts_with(MINECRAFT_VERSION_KEY))
        .and_then(parse_version_line)
}

/// First version number in `fabric.mod.json`'s `depends.minecraft` range.
///
/// `">=1.21"` yields `1.21`, `"~1.20.1"` yields `1.20.1`. Arrays of ranges use
/// their first element.
pub fn extract_from_mod_metadata(path: &Path) -> Option<String> {
    let content = match read_entry(path, FABRIC_MOD_JSON_ENTRY) {
        Ok(content) => content?,
        Err(e) => {
            warn!("Could not read {}: {:#}", path.display(), e);
            return None;
        }
    };

    let metadata: serde_json::Value = serde_json::from_str(&content).ok()?;
    let range = match metadata.get("depends")?.get("minecraft")? {
        serde_json::Value::String(range) => range.clone(),
        serde_json::Value::Array(ranges) => ranges.first()?.as_str()?.to_string(),
        _ => return None,
    };

    let re = Regex::new(r"(\d+\.\d+(?:\.\d+)?)").ok()?;
    re.captures(&range).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Manifest version, falling back to `fabric.mod.json`.
pub fn extract_with_fallback(path: &Path) -> Option<String> {
    extract_embedded_version(path).or_else(|| extract_from_mod_metadata(path))
}

/// Guess a game version from common file name conventions
/// (`mc1.21.6`, `1.21.6+`, `-1.21.6-`, `fabric_1.21.6`, `for-mc1.21.6`).
pub fn guess_version_from_filename(file_name: &str) -> Option<String> {
    const PATTERNS: [&str; 5] = [
        r"(?i)mc(\d+\.\d+(?:\.\d+)?)",
        r"(\d+\.\d+(?:\.\d+)?)\+",
        r"-(\d+\.\d+(?:\.\d+)?)-",
        r"(?i)fabric[_-](\d+\.\d+(?:\.\d+)?)",
        r"(?i)for[_-]mc(\d+\.\d+(?:\.\d+)?)",
    ];

    PATTERNS.iter().find_map(|pattern| {
        Regex::new(pattern)
            .ok()?
            .captures(file_name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// The `.old` directory of the nearest `mods` folder at or above `dir`.
///
/// `/srv/mods/pack` archives into `/srv/mods/.old`.
pub fn old_dir_for(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == MODS_DIR_NAME))
        .map(|mods_dir| mods_dir.join(OLD_DIR_NAME))
}

/// The `.old` directory belonging to the `mods` folder that contains `path`.
///
/// Uses the nearest enclosing directory named `mods`, so
/// `/srv/mods/pack/mods/x.jar` archives into `/srv/mods/pack/mods/.old`.
pub fn archive_dir_for(path: &Path) -> Result<PathBuf, ModupError> {
    path.parent().and_then(old_dir_for).ok_or_else(|| ModupError::NoModsDirectory {
        path: path.display().to_string(),
    })
}

/// Check `path` against `expected_version`; archive it on mismatch.
///
/// A matching file is left untouched. Anything else, including a jar whose
/// version cannot be read, is moved to the sibling `.old` directory of the
/// enclosing `mods` folder. Errors only when no such folder exists or the
/// move itself fails.
pub fn validate_or_archive(path: &Path, expected_version: &str) -> Result<Validation> {
    let found_version = extract_embedded_version(path);

    if found_version.as_deref() == Some(expected_version) {
        return Ok(Validation {
            valid: true,
            found_version,
            archived_path: None,
        });
    }

    let old_dir = archive_dir_for(path)?;
    let file_name = path.file_name().ok_or_else(|| ModupError::ArchiveError {
        path: path.display().to_string(),
        reason: "path has no file name".to_string(),
    })?;
    let archived_path = old_dir.join(file_name);

    move_file(path, &archived_path).map_err(|e| ModupError::ArchiveError {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })?;

    debug!(
        "Archived {} (found {:?}, expected {})",
        path.display(),
        found_version,
        expected_version
    );
    Ok(Validation {
        valid: false,
        found_version,
        archived_path: Some(archived_path),
    })
}
