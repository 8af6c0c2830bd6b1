//! Shared setup for CLI commands

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::archive::ArchiveStore;
use crate::config::GlobalConfig;
use crate::http::HttpClient;
use crate::manifest::ModsManifest;
use crate::updater::UpdateEngine;
use crate::utils::progress::ProgressBar;

/// Global flags that apply to every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub mods_config: Option<PathBuf>,
    pub mods_dir: Option<PathBuf>,
    pub no_progress: bool,
}

/// Resolved configuration for one command invocation.
///
/// Flags take precedence over the global config file, which takes precedence
/// over built-in defaults.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: GlobalConfig,
    /// Path to `mods_config.json`
    pub mods_config_path: PathBuf,
    pub mods_dir: PathBuf,
    pub no_progress: bool,
}

impl CommandContext {
    pub async fn load(options: &GlobalOptions) -> Result<Self> {
        let config = GlobalConfig::load_with_optional(options.config_path.clone()).await?;
        Ok(Self::with_config(config, options))
    }

    pub fn with_config(config: GlobalConfig, options: &GlobalOptions) -> Self {
        let mods_config_path =
            options.mods_config.clone().unwrap_or_else(|| config.mods_config.clone());
        let mods_dir = options.mods_dir.clone().unwrap_or_else(|| config.mods_dir.clone());
        Self {
            config,
            mods_config_path,
            mods_dir,
            no_progress: options.no_progress,
        }
    }

    /// Target game version: `--mc-version` if given, else the configured one.
    pub fn minecraft_version(&self, flag: Option<&str>) -> String {
        flag.map_or_else(|| self.config.minecraft_version.clone(), str::to_string)
    }

    pub fn load_manifest(&self) -> Result<ModsManifest> {
        ModsManifest::load(&self.mods_config_path)
    }

    pub fn save_manifest(&self, manifest: &ModsManifest) -> Result<()> {
        manifest.save(&self.mods_config_path)
    }

    pub fn archive_store(&self) -> ArchiveStore {
        ArchiveStore::new(&self.mods_dir)
    }

    pub fn http_client(&self) -> Result<Arc<HttpClient>> {
        let client =
            HttpClient::new(&self.config.user_agent).context("Failed to build HTTP client")?;
        Ok(Arc::new(client))
    }

    pub fn engine(&self, http: Arc<HttpClient>) -> Arc<UpdateEngine> {
        Arc::new(UpdateEngine::from_config(&self.config, http))
    }

    pub fn progress(&self, len: u64) -> ProgressBar {
        if self.no_progress { ProgressBar::hidden() } else { ProgressBar::new(len) }
    }

    pub fn spinner(&self) -> ProgressBar {
        if self.no_progress { ProgressBar::hidden() } else { ProgressBar::new_spinner() }
    }
}
