//! Group archived jars by the game version they target.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;
use crate::archive::{SortOutcome, SortReport};

#[derive(Debug, Args, Default)]
pub struct SortCommand {}

impl SortCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let store = ctx.archive_store();
        let spinner = ctx.spinner();
        spinner.set_message(format!("Sorting {}", store.old_dir().display()));
        let report = store.sort_by_version();
        spinner.finish_and_clear();

        println!("{}", render_sort_report(&report?));
        Ok(())
    }
}

pub(crate) fn render_sort_report(report: &SortReport) -> String {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            SortOutcome::Moved {
                file,
                version,
            } => format!("{} {file} → {version}/", "Moved".green()),
            SortOutcome::Skipped {
                file,
                version,
            } => format!("{} {file} (already exists in {version}/)", "Skipped".yellow()),
            SortOutcome::Undetermined {
                file,
            } => format!("Could not determine version for {file} (leaving in place)").red().to_string(),
            SortOutcome::Failed {
                file,
                reason,
            } => format!("Failed to move {file}: {reason}").red().to_string(),
        })
        .collect();

    lines.push(String::new());
    lines.push("Summary:".bold().to_string());
    lines.push(format!("  Moved: {}", report.moved()));
    lines.push(format!("  Skipped: {}", report.skipped()));
    lines.push(format!("  Failed: {}", report.failed()));
    lines.join("\n")
}
