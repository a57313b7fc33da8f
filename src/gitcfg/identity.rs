//! Git commit identity configuration
//!
//! Sets `user.name` and `user.email` when either is missing. Purely
//! interactive; a decline leaves the store untouched.

use inquire::{Confirm, Text};

use crate::error::{DevupError, Result};

use super::read_identity;

/// What the identity setter ended up doing
#[derive(Debug, PartialEq, Eq)]
pub enum IdentityOutcome {
    AlreadyConfigured,
    Declined,
    Updated { name: String, email: String },
}

/// Validate prompt input before anything is written
///
/// Both values are trimmed; an empty name or email aborts the sub-step.
pub fn validated(name: &str, email: &str) -> Result<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DevupError::EmptyIdentityField {
            field: "Name".to_string(),
        });
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(DevupError::EmptyIdentityField {
            field: "Email".to_string(),
        });
    }
    Ok((name.to_string(), email.to_string()))
}

/// Bring the commit identity to a configured state, interactively
pub fn configure(cfg: &mut git2::Config) -> Result<IdentityOutcome> {
    if read_identity(cfg).is_complete() {
        return Ok(IdentityOutcome::AlreadyConfigured);
    }

    let proceed = Confirm::new("Configure your Git commit identity?")
        .with_default(true)
        .with_help_message("Sets user.name and user.email globally")
        .prompt()?;
    if !proceed {
        return Ok(IdentityOutcome::Declined);
    }

    let name = Text::new("Name:").prompt()?;
    let email = Text::new("Email:").prompt()?;
    let (name, email) = validated(&name, &email)?;

    cfg.set_str("user.name", &name)?;
    cfg.set_str("user.email", &email)?;

    Ok(IdentityOutcome::Updated { name, email })
}
