//! Test utilities shared by unit and integration tests.
//!
//! Only compiled for tests or with the `test-utils` feature.
//!
//! - [`init_test_logging`] - once-guarded tracing setup that plays well with
//!   the test harness
//! - [`write_jar`] / [`write_mod_jar`] - craft small jar archives with a
//!   manifest and/or `fabric.mod.json`
//! - [`StaticSource`] - in-memory [`ReleaseSource`] that records every lookup

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use zip::write::SimpleFileOptions;

use crate::constants::{FABRIC_MOD_JSON_ENTRY, MANIFEST_ENTRY};
use crate::models::{ReleaseCandidate, Stability};
use crate::source::{Lookup, ReleaseSource};

static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither
/// is set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}

/// Write a jar (zip) at `path` with the given optional entries.
pub fn write_jar(path: &Path, manifest: Option<&str>, fabric_mod_json: Option<&str>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create jar {}", path.display()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    if let Some(manifest) = manifest {
        zip.start_file(MANIFEST_ENTRY, options)?;
        zip.write_all(manifest.as_bytes())?;
    }
    if let Some(metadata) = fabric_mod_json {
        zip.start_file(FABRIC_MOD_JSON_ENTRY, options)?;
        zip.write_all(metadata.as_bytes())?;
    }
    zip.start_file("dummy.class", options)?;
    zip.write_all(b"\xca\xfe\xba\xbe")?;

    zip.finish()?;
    Ok(())
}

/// Manifest text declaring `minecraft_version` the way Fabric Loom writes it.
pub fn fabric_manifest(minecraft_version: &str) -> String {
    format!(
        "Manifest-Version: 1.0\r\nFabric-Gradle-Version: 8.14\r\nFabric-Minecraft-Version: {minecraft_version}\r\nFabric-Loader-Version: 0.16.14\r\n"
    )
}

/// Write a mod jar whose manifest targets `minecraft_version`.
pub fn write_mod_jar(path: &Path, minecraft_version: &str) -> Result<()> {
    write_jar(path, Some(&fabric_manifest(minecraft_version)), None)
}

/// Raw jar bytes targeting `minecraft_version`, for serving from a mock server.
pub fn mod_jar_bytes(minecraft_version: &str) -> Result<Vec<u8>> {
    let temp = tempfile::NamedTempFile::new()?;
    write_mod_jar(temp.path(), minecraft_version)?;
    Ok(std::fs::read(temp.path())?)
}

/// In-memory release source keyed by project reference.
///
/// Unknown projects resolve to [`Lookup::NotFound`]. Every lookup is recorded
/// so tests can assert call order.
pub struct StaticSource {
    name: &'static str,
    responses: HashMap<String, Lookup>,
    calls: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_lookup(mut self, project: &str, lookup: Lookup) -> Self {
        self.responses.insert(project.to_string(), lookup);
        self
    }

    /// Register a release with a `.jar` asset served from `https://example.invalid/`.
    #[must_use]
    pub fn with_release(self, project: &str, version: &str, file_name: &str) -> Self {
        let candidate = ReleaseCandidate::new(
            version,
            Stability::Release,
            format!("https://example.invalid/{file_name}"),
            file_name,
        );
        self.with_lookup(project, Lookup::Found(candidate))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReleaseSource for StaticSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, project: &str, _minecraft_version: &str) -> Lookup {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(project.to_string());
        }
        self.responses.get(project).cloned().unwrap_or(Lookup::NotFound)
    }
}
