//! Command-line interface for modup.
//!
//! # Available Commands
//!
//! - `update` - Download newer releases, verify them, and record them in
//!   `mods_config.json`
//! - `list` - Report the newest compatible release of every mod
//! - `add fork` - Register a GitHub fork to check before a mod's own source
//! - `sort` - Group archived jars in `mods/.old` by game version
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--no-progress` - Disable progress bars and spinners
//! - `--config` - Path to a custom global config file
//! - `--mods-config` - Path to `mods_config.json`
//! - `--mods-dir` - Path to the active mods folder
//!
//! # Example
//!
//! ```bash
//! modup update --dry-run
//! modup --mods-dir ./server/mods update --picky
//! modup list --format json --filter GH
//! modup add fork https://github.com/someone/fabric-carpet carpet
//! modup sort
//! ```

mod add;
pub mod common;
mod list;
mod sort;
mod update;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use common::{CommandContext, GlobalOptions};

/// Main CLI structure for modup.
///
/// Options marked `global = true` are accepted before or after the
/// subcommand.
#[derive(Parser)]
#[command(
    name = "modup",
    about = "Keep a Minecraft mods folder up to date",
    version,
    long_about = "modup downloads the newest compatible release of each mod listed in mods_config.json \
                  from Modrinth, GitHub or GitLab, verifies the game version embedded in each jar, \
                  and archives superseded files in mods/.old."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global config file (default: ~/.modup/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to mods_config.json
    #[arg(long, global = true, value_name = "PATH")]
    mods_config: Option<PathBuf>,

    /// Active mods folder; archived files go to <MODS_DIR>/.old
    #[arg(long, global = true, value_name = "PATH")]
    mods_dir: Option<PathBuf>,

    /// Disable progress bars and spinners (also honoured via `MODUP_NO_PROGRESS`)
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download newer releases and record verified versions
    Update(update::UpdateCommand),

    /// Report the newest compatible release of every mod
    List(list::ListCommand),

    /// Add entries to the mods config
    Add(add::AddCommand),

    /// Group archived jars in mods/.old by game version
    Sort(sort::SortCommand),
}

impl Cli {
    /// Log filter implied by `--verbose` / `--quiet`. `RUST_LOG` wins when set.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    #[must_use]
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            config_path: self.config.clone(),
            mods_config: self.mods_config.clone(),
            mods_dir: self.mods_dir.clone(),
            no_progress: self.no_progress,
        }
    }

    pub async fn execute(self) -> Result<()> {
        let ctx = CommandContext::load(&self.global_options()).await?;
        self.execute_with_context(&ctx).await
    }

    /// Run the subcommand against an already resolved context.
    pub async fn execute_with_context(self, ctx: &CommandContext) -> Result<()> {
        match self.command {
            Commands::Update(cmd) => cmd.execute(ctx).await,
            Commands::List(cmd) => cmd.execute(ctx).await,
            Commands::Add(cmd) => cmd.execute(ctx).await,
            Commands::Sort(cmd) => cmd.execute(ctx).await,
        }
    }
}
