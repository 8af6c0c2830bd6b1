//! Download newer mod releases and record verified versions.
//!
//! # Examples
//!
//! ```bash
//! modup update                         # archive mods/, fetch everything
//! modup update --dry-run               # show what would happen
//! modup update --picky                 # only archive files replaced by a download
//! modup update --update-config         # refresh the config from installed jars
//! modup update --mod sodium            # one mod, by id, name or slug
//! modup update --mc-version 1.21.6
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use super::common::CommandContext;
use crate::updater::{
    DecisionOptions, ModOutcome, ModReport, RunSummary, UpdateOptions, UpdateRunner,
};

#[derive(Debug, Args, Default)]
pub struct UpdateCommand {
    /// Show what would be downloaded and archived without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Refresh config fields without downloading
    #[arg(long = "update-config")]
    pub config_only: bool,

    /// Archive only installed files similar to each download instead of
    /// clearing the mods folder first
    #[arg(long)]
    pub picky: bool,

    /// Game version downloads must target (defaults to the configured one)
    #[arg(long, value_name = "VERSION")]
    pub mc_version: Option<String>,

    /// Update a single mod, matched by id, name or slug
    #[arg(long = "mod", value_name = "MOD")]
    pub only: Option<String>,
}

impl UpdateCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let mut manifest = ctx.load_manifest()?;
        let options = self.options(ctx);

        let http = ctx.http_client()?;
        let runner = UpdateRunner::new(
            ctx.engine(http.clone()),
            http,
            ctx.archive_store(),
            ctx.config.batch_size,
        );

        info!(
            "Updating {} mods for Minecraft {}",
            manifest.mods.len(),
            options.decision.minecraft_version
        );

        let dry_run = options.decision.dry_run;
        let single = options.only.is_some();
        let summary = runner
            .run(&mut manifest, &options, |report| {
                let text = if single {
                    render_single(report)
                } else {
                    render_report(report)
                };
                println!("{text}");
            })
            .await?;

        if summary.config_changed() {
            ctx.save_manifest(&manifest)?;
        }

        if !single {
            for line in closing_lines(&summary, dry_run) {
                println!("{line}");
            }
        }
        Ok(())
    }

    fn options(&self, ctx: &CommandContext) -> UpdateOptions {
        let mut decision = DecisionOptions::new(ctx.minecraft_version(self.mc_version.as_deref()));
        decision.dry_run = self.dry_run;
        decision.config_only = self.config_only;
        UpdateOptions {
            decision,
            picky: self.picky,
            only: self.only.clone(),
        }
    }
}

fn processing_label(report: &ModReport) -> String {
    let name = format!("({}) ...", report.name);
    format!("Processing {} {:<40}", report.id.bold(), name)
}

/// Output for one mod during a full run.
pub(crate) fn render_report(report: &ModReport) -> String {
    let label = processing_label(report);
    let decision = &report.decision;
    let file_name = decision.file_name().unwrap_or_default();

    match &report.outcome {
        ModOutcome::Error(message) => format!("{label} {}", message.red()),
        ModOutcome::NoUpdate {
            installed_minecraft_version,
            checked_forks,
        } => {
            let found =
                decision.version().map(|v| format!(" (found: {v})")).unwrap_or_default();
            let installed = installed_minecraft_version.as_deref().unwrap_or("Unknown");
            let mut text = format!(
                "No update found for {}{found} [mod MC version: {installed}].",
                report.id
            );
            if !checked_forks.is_empty() {
                text.push_str(" (Checked forks)");
                for fork in checked_forks {
                    text.push_str(&format!("\n\t\t  Checked fork: {fork}"));
                }
            }
            format!("{label} {}", text.yellow())
        }
        ModOutcome::WouldDownload {
            superseded,
        } => {
            let mut lines: Vec<String> = superseded
                .iter()
                .map(|old| format!("[Dry-run] Would archive old mod file: {old}").yellow().to_string())
                .collect();
            lines.push(format!(
                "{} {label} Would download [{}] {}",
                "[Dry-run]".yellow().italic(),
                decision.source.to_string().bold(),
                file_name.cyan().bold()
            ));
            lines.join("\n")
        }
        ModOutcome::AlreadyArchived => format!(
            "{label} {}",
            format!(
                "Skipping {file_name}: version {} is archived in .old",
                decision.version().unwrap_or_default()
            )
            .yellow()
        ),
        ModOutcome::Updated {
            archived,
            ..
        } => {
            let mut lines: Vec<String> = archived
                .iter()
                .map(|old| format!("Archived similar mod file: {old}").yellow().to_string())
                .collect();
            lines.push(format!(
                "{label} Downloaded [{}] {}",
                decision.source.to_string().bold(),
                file_name.cyan().bold()
            ));
            lines.join("\n")
        }
        ModOutcome::VersionMismatch {
            expected_version,
            found_version,
            ..
        } => format!(
            "{label} {}",
            format!(
                "Skipping config update: downloaded mod version ({}) does not match expected ({expected_version})",
                found_version.as_deref().unwrap_or("unknown")
            )
            .yellow()
            .bold()
        ),
        ModOutcome::DownloadFailed(reason) => {
            format!("{label} {}", format!("Error during version check/archive: {reason}").red())
        }
        ModOutcome::ConfigRefreshed => format!(
            "{label} {}",
            format!("Config updated to {}", decision.version().unwrap_or_default()).green()
        ),
        ModOutcome::ConfigUnchanged => format!(
            "{label} {}",
            format!("{file_name} is not installed or does not match; config unchanged").yellow()
        ),
    }
}

/// Output for `--mod` runs.
pub(crate) fn render_single(report: &ModReport) -> String {
    let label = format!("Processing {} ({}) ...", report.id.bold(), report.name.green().bold());
    match &report.outcome {
        ModOutcome::Updated {
            ..
        }
        | ModOutcome::ConfigRefreshed => format!(
            "{label} {}",
            format!("Downloading and updated config for '{}'.", report.name).green().bold()
        ),
        ModOutcome::VersionMismatch {
            ..
        }
        | ModOutcome::DownloadFailed(_)
        | ModOutcome::AlreadyArchived => format!(
            "{label} {}",
            format!("Failed to download or validate mod '{}'.", report.name).red()
        ),
        _ => render_report(report),
    }
}

/// Lines printed once every mod has been processed.
pub(crate) fn closing_lines(summary: &RunSummary, dry_run: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.config_changed() {
        lines.push(format!("{} See mods_config.json for results.", "Config updated.".green().bold()));
    } else if dry_run {
        lines.push(format!("{}: config not updated.", "Dry run".yellow().bold()));
    }
    if !summary.any_update {
        lines.push("Nothing found to update.".red().to_string());
    }
    lines
}
