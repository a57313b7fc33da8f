//! SSH agent socket discovery and identity classification
//!
//! The vendor (password manager) agent advertises a Unix domain socket under
//! the user's container directory; the OS agent lives under a launchd
//! listeners path. Sockets can disappear between discovery and use, so
//! liveness is rechecked lazily wherever it matters instead of being treated
//! as an error.

use std::ffi::OsStr;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{Glob, Pattern};

use crate::common::exec;

/// Container area searched for the vendor agent socket, relative to home
pub const VENDOR_CONTAINER_SUBDIR: &str = "Library/Group Containers";

/// Path-segment pattern of the vendor agent socket below the container area
pub const VENDOR_SOCKET_GLOB: &str = "*com.1password*/t/agent.sock";

/// Bounded search depth below the container area
const DISCOVERY_DEPTH: usize = 3;

/// Find the vendor agent socket, if any
///
/// Takes the first match in filesystem traversal order; with multiple vendor
/// accounts the winner is non-deterministic.
pub fn discover_vendor_socket(home: &Path) -> Option<PathBuf> {
    let root = home.join(VENDOR_CONTAINER_SUBDIR);
    let glob = Glob::new(VENDOR_SOCKET_GLOB).ok()?;

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(DISCOVERY_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        if glob.is_match(relative) && is_live_socket(entry.path()) {
            return Some(entry.path().to_path_buf());
        }
    }
    None
}

/// Whether a path names the OS agent's launchd listener socket
pub fn is_system_agent_socket(path: &Path) -> bool {
    let launchd_segment = path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| s.starts_with("com.apple.launchd."))
    });
    launchd_segment && path.file_name() == Some(OsStr::new("Listeners"))
}

/// Whether the path currently refers to a socket special file
pub fn is_live_socket(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.file_type().is_socket())
}

/// Classified state of the agent's loaded identities
#[derive(Debug, PartialEq, Eq)]
pub enum IdentityStatus {
    /// `ssh-add` itself is not on PATH
    CommandMissing,
    /// The agent did not answer
    Unreachable,
    /// Reachable, zero identities loaded
    NoIdentities,
    /// Reachable with this many identities
    Loaded(usize),
    /// The listing did not look like identity lines
    Unparseable,
}

/// Classify an `ssh-add -l` exit status and stdout
pub fn classify_listing(status_code: Option<i32>, stdout: &str) -> IdentityStatus {
    match status_code {
        Some(0) => {
            let lines: Vec<&str> = stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            // Identity lines start with the key's bit length.
            let identities = lines
                .iter()
                .filter(|l| {
                    l.split_whitespace()
                        .next()
                        .is_some_and(|first| first.parse::<u32>().is_ok())
                })
                .count();
            if identities == lines.len() && identities > 0 {
                IdentityStatus::Loaded(identities)
            } else {
                IdentityStatus::Unparseable
            }
        }
        Some(1) => IdentityStatus::NoIdentities,
        _ => IdentityStatus::Unreachable,
    }
}

/// Ask the agent behind `ssh_auth_sock` for its loaded identities
pub fn query_identities(ssh_auth_sock: Option<&Path>) -> IdentityStatus {
    let Some(ssh_add) = exec::resolve("ssh-add") else {
        return IdentityStatus::CommandMissing;
    };

    // An unset socket is passed through as empty, which the agent client
    // treats the same as missing.
    let sock_value = ssh_auth_sock
        .map(|p| p.as_os_str().to_os_string())
        .unwrap_or_default();

    match exec::capture_with_env(&ssh_add, ["-l"], "SSH_AUTH_SOCK", &sock_value) {
        Ok(output) => classify_listing(
            output.status.code(),
            &String::from_utf8_lossy(&output.stdout),
        ),
        Err(_) => IdentityStatus::Unreachable,
    }
}
