//! SSH commit-signing configuration
//!
//! Brings `{gpg.format, commit.gpgsign, user.signingkey}` to
//! `{ssh, true, <algorithm> <material>}`, selecting the key from the ones the
//! SSH agent has loaded. The ask (prompts) is kept apart from the decide
//! (selection) so the decision logic stays unit-testable.

use console::Style;
use inquire::{Confirm, Text};

use crate::common::exec;
use crate::error::{DevupError, Result};

use super::read_signing;

/// Key types accepted for signing
const ED25519_FAMILY: [&str; 2] = ["ssh-ed25519", "sk-ssh-ed25519@openssh.com"];

/// One public key as listed by the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentKey {
    pub algorithm: String,
    pub material: String,
    pub comment: Option<String>,
}

impl AgentKey {
    /// The value stored in `user.signingkey`: algorithm and base64 material,
    /// comment dropped (Git does not need it)
    pub fn signing_value(&self) -> String {
        format!("{} {}", self.algorithm, self.material)
    }

    /// Label shown when enumerating keys for selection
    pub fn display_label(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{} ({comment})", self.algorithm),
            None => format!("{} {}…", self.algorithm, &self.material[..self.material.len().min(12)]),
        }
    }
}

fn looks_like_key_type(token: &str) -> bool {
    token.starts_with("ssh-") || token.starts_with("sk-") || token.starts_with("ecdsa-")
}

/// Parse `ssh-add -L` output into keys
///
/// Lines that are not `<type> <base64> [comment]` (e.g. the "no identities"
/// notice) are ignored.
pub fn parse_agent_keys(output: &str) -> Vec<AgentKey> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let algorithm = parts.next()?;
            if !looks_like_key_type(algorithm) {
                return None;
            }
            let material = parts.next()?;
            let comment = parts.collect::<Vec<_>>().join(" ");
            Some(AgentKey {
                algorithm: algorithm.to_string(),
                material: material.to_string(),
                comment: (!comment.is_empty()).then_some(comment),
            })
        })
        .collect()
}

/// Keep only keys in the ed25519 family
pub fn ed25519_keys(keys: Vec<AgentKey>) -> Vec<AgentKey> {
    keys.into_iter()
        .filter(|k| ED25519_FAMILY.contains(&k.algorithm.as_str()))
        .collect()
}

/// Resolve a 1-based selection against the key list
///
/// Empty input is a clean cancellation; a non-numeric or out-of-range input
/// is an error and nothing gets written.
pub fn select_key<'a>(keys: &'a [AgentKey], input: &str) -> Result<Option<&'a AgentKey>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let index: usize = trimmed
        .parse()
        .map_err(|_| DevupError::InvalidKeySelection {
            input: trimmed.to_string(),
        })?;
    if index == 0 || index > keys.len() {
        return Err(DevupError::InvalidKeySelection {
            input: trimmed.to_string(),
        });
    }
    Ok(Some(&keys[index - 1]))
}

/// What the signing setter ended up doing
#[derive(Debug, PartialEq, Eq)]
pub enum SigningOutcome {
    AlreadyConfigured,
    Declined,
    Cancelled,
    Updated { key: String },
}

/// Bring commit signing to the target state, interactively when needed
pub fn configure(cfg: &mut git2::Config) -> Result<SigningOutcome> {
    if read_signing(cfg).is_complete() {
        return Ok(SigningOutcome::AlreadyConfigured);
    }

    let proceed = Confirm::new("Configure Git commit signing with an SSH key?")
        .with_default(true)
        .with_help_message("Sets gpg.format, commit.gpgsign and user.signingkey globally")
        .prompt()?;
    if !proceed {
        return Ok(SigningOutcome::Declined);
    }

    let ssh_add = exec::resolve("ssh-add").ok_or_else(|| DevupError::CommandMissing {
        name: "ssh-add".to_string(),
    })?;
    let output = exec::capture(&ssh_add, ["-L"])?;
    if !output.status.success() {
        // Exit 1 means the agent is reachable but holds no identities.
        return Err(DevupError::NoSigningKeys);
    }

    let keys = ed25519_keys(parse_agent_keys(&String::from_utf8_lossy(&output.stdout)));
    if keys.is_empty() {
        return Err(DevupError::NoSigningKeys);
    }

    let key = if keys.len() == 1 {
        println!("Using the only loaded key: {}", keys[0].display_label());
        &keys[0]
    } else {
        println!("Multiple ed25519 keys are loaded:");
        for (i, key) in keys.iter().enumerate() {
            println!(
                "  {} {}",
                Style::new().bold().apply_to(format!("{})", i + 1)),
                key.display_label()
            );
        }
        let input = Text::new("Select a key by number:")
            .with_help_message("Press Enter without a number to cancel")
            .prompt()?;
        match select_key(&keys, &input)? {
            Some(key) => key,
            None => return Ok(SigningOutcome::Cancelled),
        }
    };

    write_signing(cfg, key)?;
    Ok(SigningOutcome::Updated {
        key: key.signing_value(),
    })
}

/// Persist the target signing state
pub fn write_signing(cfg: &mut git2::Config, key: &AgentKey) -> Result<()> {
    cfg.set_str("gpg.format", "ssh")?;
    cfg.set_bool("commit.gpgsign", true)?;
    cfg.set_str("user.signingkey", &key.signing_value())?;
    Ok(())
}
