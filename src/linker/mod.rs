//! Safe, idempotent symlink installation with backup-on-conflict
//!
//! The linker makes `target` a symbolic link to `source` without data loss:
//! whatever already exists at `target` (file, directory, or foreign symlink)
//! is renamed to a timestamped backup before the link is created. Re-running
//! against an already-correct link is a no-op and must not create backup
//! churn.
//!
//! Link creation is rename-based: the new symlink is staged under a temporary
//! name in the target's parent directory and then renamed over `target`, so
//! there is no window in which `target` is missing once it has ever existed.

use std::path::{Path, PathBuf};

use chrono::Local;
use normpath::PathExt;

use crate::error::{DevupError, Result};

/// A source file inside the managed repository and the place in the user's
/// home area it should be linked from
#[derive(Debug, Clone)]
pub struct LinkSpec {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl LinkSpec {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// What [`install_link`] did
#[derive(Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Target already links to source; nothing was touched
    AlreadyLinked,
    /// A new link was created, possibly after backing up prior state
    Created { backup: Option<PathBuf> },
}

/// Make `spec.target` a symlink to `spec.source`
pub fn install_link(spec: &LinkSpec) -> Result<LinkOutcome> {
    if !spec.source.exists() {
        return Err(DevupError::LinkSourceMissing {
            path: spec.source.display().to_string(),
        });
    }

    if is_current_link(&spec.target, &spec.source) {
        return Ok(LinkOutcome::AlreadyLinked);
    }

    let parent = spec.target.parent().ok_or_else(|| DevupError::LinkFailed {
        path: spec.target.display().to_string(),
        reason: "target has no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| DevupError::LinkFailed {
        path: parent.display().to_string(),
        reason: e.to_string(),
    })?;

    // Stage the new symlink next to the target so the final rename stays on
    // one filesystem.
    let staged = staged_path(&spec.target, parent);
    if staged.symlink_metadata().is_ok() {
        let _ = std::fs::remove_file(&staged);
    }
    std::os::unix::fs::symlink(&spec.source, &staged).map_err(|e| DevupError::LinkFailed {
        path: spec.target.display().to_string(),
        reason: e.to_string(),
    })?;

    let backup = match back_up_existing(&spec.target) {
        Ok(backup) => backup,
        Err(e) => {
            let _ = std::fs::remove_file(&staged);
            return Err(e);
        }
    };

    if let Err(e) = std::fs::rename(&staged, &spec.target) {
        let _ = std::fs::remove_file(&staged);
        return Err(DevupError::LinkFailed {
            path: spec.target.display().to_string(),
            reason: e.to_string(),
        });
    }

    Ok(LinkOutcome::Created { backup })
}

/// True when `target` is a symlink whose destination resolves to `source`
fn is_current_link(target: &Path, source: &Path) -> bool {
    let Ok(dest) = std::fs::read_link(target) else {
        return false;
    };

    // A stored relative destination is interpreted against the link's parent.
    let resolved = if dest.is_absolute() {
        dest
    } else {
        match target.parent() {
            Some(parent) => parent.join(dest),
            None => return false,
        }
    };

    normalized(&resolved) == normalized(source)
}

fn normalized(path: &Path) -> PathBuf {
    path.normalize()
        .map(|np| np.into_path_buf())
        .unwrap_or_else(|_| path.to_path_buf())
}

fn staged_path(target: &Path, parent: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "link".to_string());
    parent.join(format!(".{name}.devup-staged"))
}

/// Rename whatever exists at `target` to a timestamped backup
///
/// Returns the backup path, or `None` when nothing existed. A dangling
/// symlink still counts as existing state worth preserving.
fn back_up_existing(target: &Path) -> Result<Option<PathBuf>> {
    if target.symlink_metadata().is_err() {
        return Ok(None);
    }

    let backup = available_backup_path(target);
    std::fs::rename(target, &backup).map_err(|e| DevupError::BackupFailed {
        path: target.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(backup))
}

fn available_backup_path(target: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let base = format!("{}.bak.{stamp}", target.display());
    let mut candidate = PathBuf::from(&base);
    let mut counter = 1;
    while candidate.symlink_metadata().is_ok() {
        candidate = PathBuf::from(format!("{base}-{counter}"));
        counter += 1;
    }
    candidate
}
