//! Common test utilities for modup integration tests
//!
//! Every test gets its own [`TestEnv`]: a temp directory holding a global
//! config whose API endpoints point at a mock server, a `mods_config.json`,
//! and a `mods/` folder. The binary is always run with explicit paths so no
//! test touches the real home directory.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
    config_path: PathBuf,
    mods_config: PathBuf,
    mods_dir: PathBuf,
}

impl TestEnv {
    /// Create an environment whose Modrinth, GitHub and GitLab APIs all live
    /// at `api_base`.
    pub fn new(api_base: &str) -> Result<Self> {
        Self::with_minecraft_version(api_base, "1.21.8")
    }

    pub fn with_minecraft_version(api_base: &str, minecraft_version: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        let config_path = root.join("config.toml");
        let mods_config = root.join("mods_config.json");
        let mods_dir = root.join("mods");
        fs::create_dir_all(&mods_dir)?;

        let config = format!(
            r#"minecraft_version = "{minecraft_version}"
loader = "fabric"
batch_size = 2
user_agent = "modup-integration-tests"
modrinth_api = "{api_base}"
github_api = "{api_base}"
gitlab_api = "{api_base}"
"#
        );
        fs::write(&config_path, config).context("Failed to write test config")?;

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            config_path,
            mods_config,
            mods_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mods_dir(&self) -> &Path {
        &self.mods_dir
    }

    pub fn old_dir(&self) -> PathBuf {
        self.mods_dir.join(".old")
    }

    pub fn mods_config_path(&self) -> &Path {
        &self.mods_config
    }

    pub fn write_mods_config(&self, value: &serde_json::Value) -> Result<()> {
        fs::write(&self.mods_config, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    pub fn read_mods_config(&self) -> Result<serde_json::Value> {
        let content = fs::read_to_string(&self.mods_config)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Path of `name` inside the mods folder.
    pub fn installed(&self, name: &str) -> PathBuf {
        self.mods_dir.join(name)
    }

    /// Path of `name` inside `mods/.old`.
    pub fn archived(&self, name: &str) -> PathBuf {
        self.old_dir().join(name)
    }

    /// Run `modup` with this environment's paths.
    ///
    /// The binary runs on a blocking thread so the mock server keeps serving
    /// while the test waits.
    pub async fn run_modup(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = assert_cmd::Command::cargo_bin("modup")?;
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--mods-config")
            .arg(&self.mods_config)
            .arg("--mods-dir")
            .arg(&self.mods_dir)
            .args(args)
            .current_dir(&self.root)
            .env("MODUP_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");

        let output = tokio::task::spawn_blocking(move || cmd.output()).await??;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Captured result of one `modup` invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
