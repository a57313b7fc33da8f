//! Well-known paths and PATH introspection

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::error::{DevupError, Result};

/// The user's home directory
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| DevupError::IoError {
        message: "Could not determine home directory".to_string(),
    })
}

/// The editor's per-user configuration directory
///
/// macOS: `~/Library/Application Support/Code/User`, Linux: `~/.config/Code/User`.
pub fn editor_user_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().ok_or_else(|| DevupError::IoError {
        message: "Could not determine user configuration directory".to_string(),
    })?;
    Ok(config.join("Code").join("User"))
}

/// Split a PATH value into its entries, preserving order
pub fn path_entries(path: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(path).collect()
}

/// Entries appearing more than once in a PATH value, with their counts
///
/// Order of first appearance is preserved so the report is stable.
pub fn duplicate_entries(path: &OsStr) -> Vec<(PathBuf, usize)> {
    let entries = path_entries(path);
    let mut counts: HashMap<&PathBuf, usize> = HashMap::new();
    for entry in &entries {
        *counts.entry(entry).or_insert(0) += 1;
    }

    let mut seen = Vec::new();
    let mut duplicates = Vec::new();
    for entry in &entries {
        if seen.contains(&entry) {
            continue;
        }
        seen.push(entry);
        let count = counts[entry];
        if count > 1 {
            duplicates.push((entry.clone(), count));
        }
    }
    duplicates
}
