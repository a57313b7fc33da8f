//! Setup command implementation
//!
//! Orchestrates the one-time/idempotent bootstrap, strictly sequential:
//! 1. Verify the dotfiles repository's editor resources (fatal when missing)
//! 2. Link settings and keybindings into the editor's user directory
//! 3. Install the listed editor extensions (best effort)
//! 4. Configure Git commit signing and identity (independent sub-steps)
//! 5. Run the doctor and print its report
//!
//! The command exits 0 on completion even when sub-steps were skipped,
//! declined or partially failed; only missing required resources and linker
//! failures abort with non-zero before further work.

use std::path::PathBuf;

use console::Style;
use normpath::PathExt;

use crate::common::paths;
use crate::doctor::{self, DoctorOptions, EnvContext};
use crate::error::{DevupError, Result};
use crate::extensions::{self, PassOutcome, Skipped};
use crate::gitcfg::{self, identity, signing};
use crate::linker::{LinkOutcome, LinkSpec, install_link};

/// Name of the editor resource directory inside the dotfiles repository
const EDITOR_RESOURCE_DIR: &str = "vscode";

/// Run the setup command
pub fn run(dotfiles: Option<PathBuf>, verbose: bool) -> Result<()> {
    let root = match dotfiles {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| DevupError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?,
    };
    // Link sources must be absolute; a relative --dotfiles would otherwise
    // produce symlinks interpreted against the target's parent.
    let root = root
        .normalize()
        .map(|np| np.into_path_buf())
        .unwrap_or(root);

    let resource_dir = root.join(EDITOR_RESOURCE_DIR);
    if !resource_dir.is_dir() {
        return Err(DevupError::DotfilesDirNotFound {
            path: resource_dir.display().to_string(),
        });
    }

    let settings = resource_dir.join("settings.json");
    if !settings.exists() {
        return Err(DevupError::RequiredResourceMissing {
            path: settings.display().to_string(),
        });
    }

    let keybindings = resource_dir.join("keybindings.json");
    ensure_default_keybindings(&keybindings)?;

    section("Linking configuration");
    let user_dir = paths::editor_user_dir()?;
    for (source, name) in [(&settings, "settings.json"), (&keybindings, "keybindings.json")] {
        let spec = LinkSpec::new(source.clone(), user_dir.join(name));
        link_and_report(&spec)?;
    }

    section("Installing extensions");
    match extensions::install_from_file(&resource_dir.join("extensions.txt"), verbose)? {
        PassOutcome::Skipped(Skipped::ListMissing(path)) => {
            println!(
                "  {} no extension list at {}",
                Style::new().yellow().apply_to("skipped:"),
                path.display()
            );
        }
        PassOutcome::Skipped(Skipped::CliMissing) => {
            println!(
                "  {} '{}' CLI not found on PATH",
                Style::new().yellow().apply_to("skipped:"),
                extensions::EDITOR_CLI
            );
        }
        PassOutcome::Completed(summary) => {
            println!(
                "  {} installed, {} failed",
                summary.installed.len(),
                summary.failed.len()
            );
        }
    }

    section("Configuring Git");
    configure_git();

    section("Doctor");
    let (report, _env) = doctor::run_checks(EnvContext::from_process(), &DoctorOptions::default());
    report.print();

    Ok(())
}

fn section(title: &str) {
    println!();
    println!("{}", Style::new().bold().apply_to(title));
}

fn ensure_default_keybindings(keybindings: &std::path::Path) -> Result<()> {
    if keybindings.exists() {
        return Ok(());
    }
    // Seed the repository with an empty keybindings list so it can be linked.
    let empty = serde_json::Value::Array(Vec::new());
    let rendered =
        serde_json::to_string_pretty(&empty).unwrap_or_else(|_| "[]".to_string());
    std::fs::write(keybindings, rendered + "\n").map_err(|e| DevupError::FileWriteFailed {
        path: keybindings.display().to_string(),
        reason: e.to_string(),
    })
}

fn link_and_report(spec: &LinkSpec) -> Result<()> {
    match install_link(spec)? {
        LinkOutcome::AlreadyLinked => {
            println!("  already linked: {}", spec.target.display());
        }
        LinkOutcome::Created { backup: None } => {
            println!(
                "  linked: {} -> {}",
                spec.target.display(),
                spec.source.display()
            );
        }
        LinkOutcome::Created {
            backup: Some(backup),
        } => {
            println!(
                "  linked: {} -> {} (previous saved as {})",
                spec.target.display(),
                spec.source.display(),
                backup.display()
            );
        }
    }
    Ok(())
}

/// Run both Git sub-steps; a failure in one never blocks the other
fn configure_git() {
    match gitcfg::open_global() {
        Ok(mut cfg) => {
            match signing::configure(&mut cfg) {
                Ok(signing::SigningOutcome::AlreadyConfigured) => {
                    println!("  commit signing already configured");
                }
                Ok(signing::SigningOutcome::Declined) => {
                    println!("  commit signing left unchanged");
                }
                Ok(signing::SigningOutcome::Cancelled) => {
                    println!("  key selection cancelled; commit signing left unchanged");
                }
                Ok(signing::SigningOutcome::Updated { key }) => {
                    println!("  commit signing configured with {key}");
                }
                Err(e) => {
                    eprintln!("  signing setup failed: {e}");
                }
            }

            match identity::configure(&mut cfg) {
                Ok(identity::IdentityOutcome::AlreadyConfigured) => {
                    println!("  commit identity already configured");
                }
                Ok(identity::IdentityOutcome::Declined) => {
                    println!("  commit identity left unchanged");
                }
                Ok(identity::IdentityOutcome::Updated { name, email }) => {
                    println!("  commit identity set to {name} <{email}>");
                }
                Err(e) => {
                    eprintln!("  identity setup failed: {e}");
                }
            }
        }
        Err(e) => {
            eprintln!("  could not open the global Git configuration: {e}");
        }
    }
}
