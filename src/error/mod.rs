//! Error types and handling for devup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors fall into three tiers mirroring how the tool behaves at runtime:
//! - fatal setup errors (missing dotfiles resources, link failures) abort the
//!   whole run,
//! - sub-step errors (Git signing/identity configuration) abort only their
//!   own sub-procedure,
//! - diagnostic findings are not errors at all; the doctor only surfaces
//!   [`DevupError::ChecksFailed`] after the full report has been printed.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for devup operations
#[derive(Error, Diagnostic, Debug)]
pub enum DevupError {
    // Dotfiles repository errors
    #[error("Dotfiles directory not found: {path}")]
    #[diagnostic(
        code(devup::dotfiles::not_found),
        help("Run devup from your dotfiles checkout, or pass --dotfiles <PATH>")
    )]
    DotfilesDirNotFound { path: String },

    #[error("Required resource missing: {path}")]
    #[diagnostic(
        code(devup::dotfiles::resource_missing),
        help("The dotfiles repository must contain this file before it can be linked")
    )]
    RequiredResourceMissing { path: String },

    // Linker errors
    #[error("Link source does not exist: {path}")]
    #[diagnostic(
        code(devup::link::source_missing),
        help("The file the target should point at is gone; restore it first")
    )]
    LinkSourceMissing { path: String },

    #[error("Failed to back up '{path}': {reason}")]
    #[diagnostic(code(devup::link::backup_failed))]
    BackupFailed { path: String, reason: String },

    #[error("Failed to create link at '{path}': {reason}")]
    #[diagnostic(code(devup::link::create_failed))]
    LinkFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(devup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(devup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(devup::fs::io_error))]
    IoError { message: String },

    // Git configuration errors
    #[error("Git configuration operation failed: {message}")]
    #[diagnostic(code(devup::gitcfg::operation_failed))]
    GitConfigFailed { message: String },

    #[error("No ed25519 keys loaded in the SSH agent")]
    #[diagnostic(
        code(devup::gitcfg::no_signing_keys),
        help("Load a key with 'ssh-add' (or enable your password manager's agent) and retry")
    )]
    NoSigningKeys,

    #[error("Invalid key selection: {input}")]
    #[diagnostic(
        code(devup::gitcfg::invalid_selection),
        help("Enter one of the listed numbers, or press Enter to cancel")
    )]
    InvalidKeySelection { input: String },

    #[error("{field} must not be empty")]
    #[diagnostic(code(devup::gitcfg::empty_field))]
    EmptyIdentityField { field: String },

    // External command errors
    #[error("Required command not found on PATH: {name}")]
    #[diagnostic(code(devup::exec::command_missing))]
    CommandMissing { name: String },

    #[error("Command '{name}' failed: {reason}")]
    #[diagnostic(code(devup::exec::command_failed))]
    CommandFailed { name: String, reason: String },

    // Prompt errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(devup::prompt::failed))]
    PromptFailed { message: String },

    // Diagnostic aggregation
    #[error("{errors} environment check(s) failed")]
    #[diagnostic(
        code(devup::doctor::checks_failed),
        help("See the report above for the failing checks")
    )]
    ChecksFailed { errors: usize },
}

impl From<std::io::Error> for DevupError {
    fn from(err: std::io::Error) -> Self {
        DevupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<git2::Error> for DevupError {
    fn from(err: git2::Error) -> Self {
        DevupError::GitConfigFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for DevupError {
    fn from(err: inquire::InquireError) -> Self {
        DevupError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DevupError>;
