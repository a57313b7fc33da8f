//! Git global configuration access
//!
//! The core only reads and conditionally writes five keys of the global
//! store (`gpg.format`, `commit.gpgsign`, `user.signingkey`, `user.name`,
//! `user.email`), never deletes them. Access goes through [`git2::Config`]
//! opened on the global file directly, so a missing `~/.gitconfig` is created
//! on first write.

pub mod identity;
pub mod signing;

use crate::common::paths;
use crate::error::Result;

/// Current state of the commit-signing keys
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub format: Option<String>,
    pub sign_commits: bool,
    pub signing_key: Option<String>,
}

impl SigningConfig {
    /// All three fields match the target state {ssh, true, non-empty}
    pub fn is_complete(&self) -> bool {
        self.format.as_deref() == Some("ssh")
            && self.sign_commits
            && self.signing_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Current state of the commit identity keys
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl IdentityConfig {
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            && self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Open the user's global Git configuration file
pub fn open_global() -> Result<git2::Config> {
    let path = match git2::Config::find_global() {
        Ok(path) => path,
        // No global config yet; writing will create it.
        Err(_) => paths::home_dir()?.join(".gitconfig"),
    };
    Ok(git2::Config::open(&path)?)
}

/// Read the signing-related keys
pub fn read_signing(cfg: &mut git2::Config) -> SigningConfig {
    let Ok(snapshot) = cfg.snapshot() else {
        return SigningConfig::default();
    };
    SigningConfig {
        format: snapshot.get_string("gpg.format").ok(),
        sign_commits: snapshot.get_bool("commit.gpgsign").unwrap_or(false),
        signing_key: snapshot
            .get_string("user.signingkey")
            .ok()
            .filter(|k| !k.is_empty()),
    }
}

/// Read the identity keys
pub fn read_identity(cfg: &mut git2::Config) -> IdentityConfig {
    let Ok(snapshot) = cfg.snapshot() else {
        return IdentityConfig::default();
    };
    IdentityConfig {
        name: snapshot
            .get_string("user.name")
            .ok()
            .filter(|n| !n.is_empty()),
        email: snapshot
            .get_string("user.email")
            .ok()
            .filter(|e| !e.is_empty()),
    }
}
