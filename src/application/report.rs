use std::fmt::Write as _;

use colored::Colorize;

use crate::filesystem::{MaterializationReport, TargetStatus, ValidTarget};
use crate::tree::{ParseWarning, Summary};

const FOLDER: &str = "📁";
const FILE: &str = "📄";

pub fn success(message: impl AsRef<str>) -> String {
    format!("{} {}", "✓".green().bold(), message.as_ref())
}

pub fn warning(message: impl AsRef<str>) -> String {
    format!("{} {}", "⚠".yellow().bold(), message.as_ref())
}

pub fn failure(message: impl AsRef<str>) -> String {
    format!("{} {}", "✗".red().bold(), message.as_ref())
}

pub fn target(target: &ValidTarget, contents: Option<(usize, usize)>) -> String {
    match (target.status, contents) {
        (TargetStatus::WillBeCreated, _) => success(format!(
            "Target directory will be created: {}",
            target.path.display()
        )),
        (TargetStatus::Existing, Some((files, directories))) if files + directories > 0 => {
            success(format!(
                "Target directory: {} (already holds {} files, {} directories)",
                target.path.display(),
                files,
                directories
            ))
        }
        (TargetStatus::Existing, _) => {
            success(format!("Target directory: {}", target.path.display()))
        }
    }
}

pub fn parsed(summary: &Summary, warnings: &[ParseWarning]) -> String {
    let mut out = success(format!(
        "Parsed: {} directories, {} files",
        summary.directories, summary.files
    ));
    for parse_warning in warnings {
        out.push('\n');
        out.push_str(&warning(parse_warning.to_string()));
    }
    out
}

/// Lists the first `limit` paths, then how many were left out.
pub fn preview(paths: &[(String, bool)], limit: usize) -> String {
    let mut out = "Preview:".bold().to_string();
    for (path, is_directory) in paths.iter().take(limit) {
        let icon = if *is_directory { FOLDER } else { FILE };
        let _ = write!(out, "\n  {icon} {path}");
    }
    if paths.len() > limit {
        let _ = write!(out, "\n  ... and {} more items", paths.len() - limit);
    }
    out
}

pub fn materialization(report: &MaterializationReport, dry_run: bool) -> String {
    let created_label = if dry_run { "Would create" } else { "Created" };
    let mut out = success(format!("{created_label}: {}", report.created.len()));
    let _ = write!(
        out,
        "\n{}",
        warning(format!("Skipped (already exist): {}", report.skipped.len()))
    );

    if report.errors.is_empty() {
        return out;
    }

    let _ = write!(out, "\n{}", failure(format!("Errors: {}", report.errors.len())));
    for (path, reason) in &report.errors {
        let _ = write!(out, "\n  {}: {}", path.display(), reason);
    }
    out
}
