//! Report the newest compatible release of every configured mod.
//!
//! Only each mod's own source is consulted; forks are ignored. Nothing is
//! downloaded and the config is never written.
//!
//! # Output Formats
//!
//! ## Table (default)
//!
//! ```text
//! Mod Version Status Report
//! ────────────────────────────────────────────────────────────────────────
//! Name                                Source   Current              Latest               Status          Error
//! ────────────────────────────────────────────────────────────────────────
//! Sodium                              MODRINTH mc1.21.6-0.6.13      mc1.21.8-0.7.0       UPDATE AVAILABLE
//!
//! Summary:
//!   Total mods: 1
//!   Up to date: 0
//!   Updates available: 1
//!   Errors: 0
//! ```
//!
//! ## JSON
//!
//! `{"summary": {"total", "upToDate", "updatesAvailable", "errors"}, "mods": [...]}`
//!
//! ## CSV
//!
//! One quoted row per mod under a fixed header.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use super::common::CommandContext;
use crate::manifest::ModEntry;
use crate::updater::{StatusChecker, StatusSummary, VersionStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Which sources to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum SourceFilter {
    /// Modrinth
    Mr,
    /// GitHub
    Gh,
    /// GitLab
    Gl,
    #[default]
    All,
}

impl SourceFilter {
    fn accepts(self, entry: &ModEntry) -> bool {
        let code = entry.source.short_code();
        match self {
            Self::All => true,
            Self::Mr => code == Some("MR"),
            Self::Gh => code == Some("GH"),
            Self::Gl => code == Some("GL"),
        }
    }
}

#[derive(Debug, Args, Default)]
pub struct ListCommand {
    /// Game version to check against (defaults to the configured one)
    #[arg(long, value_name = "VERSION")]
    pub mc_version: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
    pub format: OutputFormat,

    /// Only include mods from this source
    #[arg(long, value_enum, default_value_t = SourceFilter::All, ignore_case = true)]
    pub filter: SourceFilter,
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    summary: StatusSummary,
    mods: &'a [VersionStatus],
}

impl ListCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let manifest = ctx.load_manifest()?;
        let minecraft_version = ctx.minecraft_version(self.mc_version.as_deref());

        let mods: Vec<ModEntry> =
            manifest.mods.into_iter().filter(|m| self.filter.accepts(m)).collect();
        if mods.is_empty() {
            println!("{}", "No mods found matching the specified criteria.".yellow());
            return Ok(());
        }

        if self.format == OutputFormat::Table {
            println!(
                "{}",
                format!("Checking {} mods for Minecraft {}...", mods.len(), minecraft_version)
                    .cyan()
            );
        }

        let checker = StatusChecker::new(ctx.engine(ctx.http_client()?), ctx.config.batch_size);
        let progress = ctx.progress(mods.len() as u64);
        progress.set_message("Checking versions");
        let rows = checker.check_all(&mods, &minecraft_version, Some(&progress)).await;
        progress.finish_and_clear();

        let output = match self.format {
            OutputFormat::Table => render_table(&rows),
            OutputFormat::Json => render_json(&rows)?,
            OutputFormat::Csv => render_csv(&rows),
        };
        println!("{output}");
        Ok(())
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

pub(crate) fn render_table(rows: &[VersionStatus]) -> String {
    let rule = "─".repeat(120);
    let mut lines = vec![
        String::new(),
        "Mod Version Status Report".bold().cyan().to_string(),
        rule.bold().to_string(),
        format!(
            "{:<35} {:<8} {:<20} {:<20} {:<15} {:<20}",
            "Name", "Source", "Current", "Latest", "Status", "Error"
        )
        .bold()
        .to_string(),
        rule.bold().to_string(),
    ];

    for row in rows {
        let name = if row.name.is_empty() { "Unknown" } else { row.name.as_str() };
        let status = if row.error.is_some() {
            format!("{:<15}", "ERROR").red()
        } else if row.update_available {
            format!("{:<15}", "UPDATE AVAILABLE").yellow()
        } else {
            format!("{:<15}", "UP TO DATE").green()
        };

        lines.push(format!(
            "{:<35} {:<8} {:<20} {:<20} {} {:<20}",
            truncate(name, 34),
            row.source,
            truncate(&row.current_version, 19),
            truncate(row.latest_version.as_deref().unwrap_or("Unknown"), 19),
            status,
            truncate(row.error.as_deref().unwrap_or_default(), 19)
        ));
    }
    lines.push(rule.bold().to_string());

    let summary = StatusSummary::from_rows(rows);
    lines.push(String::new());
    lines.push("Summary:".bold().to_string());
    lines.push(format!("  Total mods: {}", summary.total.to_string().cyan()));
    lines.push(format!("  Up to date: {}", summary.up_to_date.to_string().green()));
    lines.push(format!("  Updates available: {}", summary.updates_available.to_string().yellow()));
    lines.push(format!("  Errors: {}", summary.errors.to_string().red()));
    lines.join("\n")
}

pub(crate) fn render_json(rows: &[VersionStatus]) -> Result<String> {
    let report = StatusReport {
        summary: StatusSummary::from_rows(rows),
        mods: rows,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub(crate) fn render_csv(rows: &[VersionStatus]) -> String {
    let mut lines = vec![
        "Name,ID,Source,Slug,Current Version,Current Stability,Latest Version,Latest Stability,Update Available,Error"
            .to_string(),
    ];
    for row in rows {
        let quoted = [
            row.name.as_str(),
            row.id.as_str(),
            row.source.as_str(),
            row.slug.as_str(),
            row.current_version.as_str(),
            row.current_stability.as_str(),
            row.latest_version.as_deref().unwrap_or_default(),
            row.latest_stability.as_deref().unwrap_or_default(),
        ]
        .map(csv_field)
        .join(",");
        lines.push(format!(
            "{quoted},{},{}",
            row.update_available,
            csv_field(row.error.as_deref().unwrap_or_default())
        ));
    }
    lines.join("\n")
}
