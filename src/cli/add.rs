//! Add entries to the mods config.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::common::CommandContext;
use crate::source::github_repo_path;

#[derive(Debug, Args)]
pub struct AddCommand {
    #[command(subcommand)]
    command: AddSubcommand,
}

#[derive(Debug, Subcommand)]
enum AddSubcommand {
    /// Add a GitHub fork to check before a mod's own source
    Fork {
        /// Fork repository URL
        url: String,

        /// Mod id; inferred from the repository name when omitted
        mod_id: Option<String>,
    },
}

impl AddCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        match self.command {
            AddSubcommand::Fork {
                url,
                mod_id,
            } => {
                let message = add_fork(ctx, &url, mod_id.as_deref())?;
                println!("{message}");
                Ok(())
            }
        }
    }
}

/// Append `url` to a mod's forks and save the config.
///
/// Returns the message to show. An already-listed fork leaves the file
/// untouched.
pub(crate) fn add_fork(ctx: &CommandContext, url: &str, mod_id: Option<&str>) -> Result<String> {
    let mut manifest = ctx.load_manifest()?;

    if github_repo_path(url).is_none() {
        tracing::warn!("{} is not a GitHub repository URL; it will be skipped during updates", url);
    }

    let id = match mod_id {
        Some(id) => {
            if manifest.find_by_id(id).is_none() {
                return Err(anyhow!("Mod with id '{id}' not found."));
            }
            id.to_string()
        }
        None => manifest
            .infer_mod_for_fork(url)
            .map(|entry| entry.id.clone())
            .ok_or_else(|| {
                anyhow!("Could not infer which mod '{url}' belongs to; pass the mod id explicitly")
            })?,
    };

    if manifest.add_fork(&id, url)? {
        ctx.save_manifest(&manifest)?;
        Ok(format!("Added fork '{url}' to mod '{id}'.").green().to_string())
    } else {
        Ok(format!("Fork '{url}' already present for mod '{id}'."))
    }
}
