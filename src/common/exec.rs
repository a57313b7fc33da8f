//! External command resolution and capture
//!
//! Every external tool devup talks to (brew, code, ssh-add, bash) is reached
//! through these helpers. Commands run to completion, blocking; output is
//! captured rather than streamed since all callers parse it.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{DevupError, Result};

/// Resolve a command on the process PATH
pub fn resolve(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolve a command against an explicit PATH value instead of the
/// process environment
pub fn resolve_in(name: &str, path: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    which::which_in(name, Some(path), cwd).ok()
}

/// Run a command and capture its output
///
/// Spawn failures are surfaced as [`DevupError::CommandFailed`]; a non-zero
/// exit status is not an error here since several callers classify statuses
/// themselves.
pub fn capture<I, S>(program: &Path, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| DevupError::CommandFailed {
            name: program.display().to_string(),
            reason: e.to_string(),
        })
}

/// Run a command with one environment variable overridden, capturing output
pub fn capture_with_env<I, S>(
    program: &Path,
    args: I,
    env_key: &str,
    env_value: &OsStr,
) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .env(env_key, env_value)
        .output()
        .map_err(|e| DevupError::CommandFailed {
            name: program.display().to_string(),
            reason: e.to_string(),
        })
}

/// Trimmed stdout of a captured command
pub fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
