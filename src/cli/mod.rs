//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - doctor: Doctor command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod doctor;

pub use completions::CompletionsArgs;
pub use doctor::DoctorArgs;

/// devup - development environment bootstrapper
///
/// Link editor configuration, install extensions, configure Git signing and
/// diagnose the host environment.
#[derive(Parser, Debug)]
#[command(
    name = "devup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Personal development environment bootstrapper and doctor",
    long_about = "devup links editor configuration out of a dotfiles checkout, installs a fixed \
                  list of editor extensions, optionally configures Git SSH commit signing and \
                  identity, and diagnoses Homebrew/PATH/SSH-agent/Git state.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  devup setup              \x1b[90m# Link configs, install extensions, configure Git\x1b[0m\n   \
                  devup doctor             \x1b[90m# Diagnose the environment, read-only\x1b[0m\n   \
                  devup doctor --fix-ssh   \x1b[90m# Also select the 1Password agent socket\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Dotfiles repository root (defaults to the current directory)
    #[arg(long, short = 'd', global = true, env = "DEVUP_DOTFILES")]
    pub dotfiles: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Link configuration, install extensions, configure Git, then run doctor
    Setup,

    /// Diagnose Homebrew, PATH, SSH agent and Git signing state
    Doctor(DoctorArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
