//! Global configuration management for modup.
//!
//! The global configuration file lives at `~/.modup/config.toml`
//! (`%LOCALAPPDATA%\modup\config.toml` on Windows). The location can be
//! overridden with the `MODUP_CONFIG` environment variable or the `--config`
//! flag. Every key is optional; a missing file yields defaults.
//!
//! # Example
//!
//! ```toml
//! minecraft_version = "1.21.8"
//! mods_dir = "/srv/minecraft/mods"
//! mods_config = "/srv/minecraft/mods_config.json"
//! batch_size = 5
//! github_token = "ghp_..."
//!
//! # Endpoint overrides, mostly useful for testing
//! modrinth_api = "https://api.modrinth.com/v2"
//! github_api = "https://api.github.com"
//! gitlab_api = "https://gitlab.com/api/v4"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOADER, DEFAULT_MINECRAFT_VERSION, DEFAULT_MODS_CONFIG,
    DEFAULT_USER_AGENT, GITHUB_API_BASE, GITLAB_API_BASE, MODRINTH_API_BASE, MODS_DIR_NAME,
};
use crate::core::ModupError;

/// Environment variable pointing at an alternative global config file.
pub const CONFIG_ENV_VAR: &str = "MODUP_CONFIG";

fn default_minecraft_version() -> String {
    DEFAULT_MINECRAFT_VERSION.to_string()
}

fn default_loader() -> String {
    DEFAULT_LOADER.to_string()
}

fn default_mods_dir() -> PathBuf {
    PathBuf::from(MODS_DIR_NAME)
}

fn default_mods_config() -> PathBuf {
    PathBuf::from(DEFAULT_MODS_CONFIG)
}

const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_modrinth_api() -> String {
    MODRINTH_API_BASE.to_string()
}

fn default_github_api() -> String {
    GITHUB_API_BASE.to_string()
}

fn default_gitlab_api() -> String {
    GITLAB_API_BASE.to_string()
}

/// Global configuration structure for modup.
///
/// # Security Considerations
///
/// `github_token` is a credential. The file is written with `0600`
/// permissions on Unix and should never be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Game version downloaded mods must target.
    #[serde(default = "default_minecraft_version")]
    pub minecraft_version: String,

    /// Mod loader used to filter Modrinth versions.
    #[serde(default = "default_loader")]
    pub loader: String,

    /// Active mods folder. Archived files go to `<mods_dir>/.old`.
    #[serde(default = "default_mods_dir")]
    pub mods_dir: PathBuf,

    /// Path of the persisted mods config.
    #[serde(default = "default_mods_config")]
    pub mods_config: PathBuf,

    /// Number of mods evaluated concurrently.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Sent as a bearer token to the GitHub API to lift rate limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default = "default_modrinth_api")]
    pub modrinth_api: String,

    #[serde(default = "default_github_api")]
    pub github_api: String,

    #[serde(default = "default_gitlab_api")]
    pub gitlab_api: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            minecraft_version: default_minecraft_version(),
            loader: default_loader(),
            mods_dir: default_mods_dir(),
            mods_config: default_mods_config(),
            batch_size: default_batch_size(),
            user_agent: default_user_agent(),
            github_token: None,
            modrinth_api: default_modrinth_api(),
            github_api: default_github_api(),
            gitlab_api: default_gitlab_api(),
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default location.
    ///
    /// Honours `MODUP_CONFIG`; returns defaults if the file does not exist.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, else from `MODUP_CONFIG`, else from
    /// [`GlobalConfig::default_path`]. A missing file yields defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(value) if !value.is_empty() => PathBuf::from(value),
                _ => Self::default_path()?,
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load global configuration from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| ModupError::GlobalConfigError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if config.batch_size == 0 {
            return Err(ModupError::GlobalConfigError {
                file: path.display().to_string(),
                reason: "batch_size must be at least 1".to_string(),
            }
            .into());
        }

        Ok(config)
    }

    /// Save global configuration to a specific file path.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write global config to {}", path.display()))?;

        // May hold a GitHub token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set secure permissions on {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Get the default file path for global configuration.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\modup\config.toml`
    /// - **Unix/macOS**: `~/.modup/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("modup")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".modup")
        };

        Ok(config_dir.join("config.toml"))
    }
}
