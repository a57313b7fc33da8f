//! Editor extension installation from a one-per-line list resource
//!
//! The list is a best-effort convenience layer, not a transactional unit: a
//! missing list file or a missing editor CLI downgrades the whole pass to a
//! notice, and one failed install never stops the rest.

use std::path::{Path, PathBuf};

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::common::exec;
use crate::error::{DevupError, Result};

/// Name of the editor CLI used to install extensions
pub const EDITOR_CLI: &str = "code";

/// Result of one extension install pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

/// Why an install pass did nothing
#[derive(Debug, PartialEq, Eq)]
pub enum Skipped {
    ListMissing(PathBuf),
    CliMissing,
}

/// Outcome of [`install_from_file`]
#[derive(Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Skipped(Skipped),
    Completed(InstallSummary),
}

/// Parse an extension list: one identifier per line, trimmed; blank lines and
/// `#` comment lines are ignored. Order is preserved and duplicates are kept
/// (re-installs are idempotent no-ops at the editor CLI).
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Install every identifier via `installer`, tolerating per-item failure
///
/// The installer callback returns whether the invocation succeeded; it is
/// called exactly once per identifier, in list order, regardless of earlier
/// failures.
pub fn install_all<F>(identifiers: &[String], mut installer: F) -> InstallSummary
where
    F: FnMut(&str) -> bool,
{
    let mut summary = InstallSummary::default();
    for id in identifiers {
        if installer(id) {
            summary.installed.push(id.clone());
        } else {
            summary.failed.push(id.clone());
        }
    }
    summary
}

/// Run the full extension pass against a list file on disk
pub fn install_from_file(list_path: &Path, verbose: bool) -> Result<PassOutcome> {
    if !list_path.exists() {
        return Ok(PassOutcome::Skipped(Skipped::ListMissing(
            list_path.to_path_buf(),
        )));
    }

    let Some(cli) = exec::resolve(EDITOR_CLI) else {
        return Ok(PassOutcome::Skipped(Skipped::CliMissing));
    };

    let text =
        std::fs::read_to_string(list_path).map_err(|e| DevupError::FileReadFailed {
            path: list_path.display().to_string(),
            reason: e.to_string(),
        })?;
    let identifiers = parse_list(&text);

    if identifiers.is_empty() {
        println!("No extensions listed in {}", list_path.display());
        return Ok(PassOutcome::Completed(InstallSummary::default()));
    }

    let pb = ProgressBar::new(identifiers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let summary = install_all(&identifiers, |id| {
        pb.set_message(id.to_string());
        let result = exec::capture(&cli, ["--install-extension", id]);
        pb.inc(1);
        match result {
            Ok(output) if output.status.success() => {
                if verbose {
                    pb.println(format!("  installed {id}"));
                }
                true
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                pb.println(format!(
                    "  {} {id}: {}",
                    Style::new().yellow().apply_to("skipped"),
                    stderr.trim()
                ));
                false
            }
            Err(e) => {
                pb.println(format!(
                    "  {} {id}: {e}",
                    Style::new().yellow().apply_to("skipped")
                ));
                false
            }
        }
    });
    pb.finish_and_clear();

    Ok(PassOutcome::Completed(summary))
}
