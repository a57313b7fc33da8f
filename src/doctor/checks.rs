//! The individual doctor checks, in their fixed run order
//!
//! Each check is a function of the [`EnvContext`] snapshot (plus, for the
//! Homebrew-dependent checks, a [`BrewInfo`] probed once up front) and yields
//! its finding(s) without mutating anything. The single exception is the SSH
//! agent check, whose documented corrective action rewrites the context's
//! `ssh_auth_sock` when requested.

use std::path::PathBuf;

use crate::common::{exec, paths};
use crate::gitcfg;
use crate::sshagent::{self, IdentityStatus};

use super::{EnvContext, Finding};

/// Minimum supported bash major version; the surrounding shell tooling
/// relies on features from this era
const MIN_BASH_MAJOR: u32 = 4;

/// Options for one doctor run
#[derive(Debug, Default, Clone, Copy)]
pub struct DoctorOptions {
    /// Apply the corrective SSH agent socket selection
    pub fix_ssh: bool,
}

/// Homebrew binary and install prefix, probed once per run
#[derive(Debug, Default)]
pub struct BrewInfo {
    pub binary: Option<PathBuf>,
    pub prefix: Option<PathBuf>,
}

pub fn probe_brew(ctx: &EnvContext) -> BrewInfo {
    let Some(binary) = exec::resolve_in("brew", &ctx.path) else {
        return BrewInfo::default();
    };
    let prefix = exec::capture(&binary, ["--prefix"])
        .ok()
        .filter(|o| o.status.success())
        .map(|o| PathBuf::from(exec::stdout_line(&o)))
        .filter(|p| !p.as_os_str().is_empty());
    BrewInfo {
        binary: Some(binary),
        prefix,
    }
}

pub fn check_os(ctx: &EnvContext) -> Finding {
    if ctx.os == "macos" {
        Finding::ok("os", "macOS host")
    } else {
        Finding::warning(
            "os",
            format!("host OS is '{}'; checks are tuned for macOS and may be inaccurate", ctx.os),
        )
    }
}

/// Extract the major version from `bash --version` output
pub fn parse_bash_major(output: &str) -> Option<u32> {
    let line = output.lines().next()?;
    let rest = line.split("version ").nth(1)?;
    let version = rest.split_whitespace().next()?;
    version.split('.').next()?.parse().ok()
}

pub fn check_shell(ctx: &EnvContext) -> Finding {
    let Some(bash) = exec::resolve_in("bash", &ctx.path) else {
        return Finding::warning("shell", "bash not found on PATH");
    };
    let Ok(output) = exec::capture(&bash, ["--version"]) else {
        return Finding::warning("shell", "could not run 'bash --version'");
    };
    match parse_bash_major(&String::from_utf8_lossy(&output.stdout)) {
        Some(major) if major >= MIN_BASH_MAJOR => {
            Finding::ok("shell", format!("bash major version {major}"))
        }
        Some(major) => Finding::error(
            "shell",
            format!("bash {major}.x is too old; version {MIN_BASH_MAJOR}+ is required"),
        ),
        None => Finding::warning("shell", "could not parse 'bash --version' output"),
    }
}

pub fn check_brew(brew: &BrewInfo) -> Finding {
    match (&brew.binary, &brew.prefix) {
        (Some(_), Some(prefix)) => {
            Finding::ok("brew", format!("Homebrew at prefix {}", prefix.display()))
        }
        (Some(binary), None) => Finding::warning(
            "brew",
            format!("'{} --prefix' failed; install may be broken", binary.display()),
        ),
        (None, _) => Finding::error("brew", "Homebrew not found on PATH"),
    }
}

pub fn check_path_duplicates(ctx: &EnvContext) -> Finding {
    let duplicates = paths::duplicate_entries(&ctx.path);
    if duplicates.is_empty() {
        return Finding::ok("path", "no duplicate PATH entries");
    }
    let listed = duplicates
        .iter()
        .map(|(entry, count)| format!("{} ({count}x)", entry.display()))
        .collect::<Vec<_>>()
        .join(", ");
    // Duplicates are tolerated, never corrected: removal could break an
    // intentional ordering.
    Finding::warning("path", format!("duplicate PATH entries: {listed}"))
}

pub fn check_path_precedence(ctx: &EnvContext, brew: &BrewInfo) -> Finding {
    let Some(prefix) = &brew.prefix else {
        return Finding::ok("path", "precedence check skipped (Homebrew not installed)");
    };
    let brew_bin = prefix.join("bin");
    match paths::path_entries(&ctx.path).first() {
        Some(first) if *first == brew_bin => {
            Finding::ok("path", format!("{} leads PATH", brew_bin.display()))
        }
        _ => Finding::warning(
            "path",
            format!(
                "{} is not the first PATH entry; Homebrew tools may be shadowed",
                brew_bin.display()
            ),
        ),
    }
}

pub fn check_python_origin(ctx: &EnvContext, brew: &BrewInfo) -> Finding {
    let Some(prefix) = &brew.prefix else {
        return Finding::ok("python", "origin check skipped (Homebrew not installed)");
    };
    let Some(python) = exec::resolve_in("python3", &ctx.path) else {
        return Finding::warning("python", "python3 not found on PATH");
    };
    if python.starts_with(prefix) {
        Finding::ok("python", format!("python3 from Homebrew ({})", python.display()))
    } else {
        Finding::warning(
            "python",
            format!("python3 resolves to {} instead of the Homebrew one", python.display()),
        )
    }
}

pub fn check_editor_cli(ctx: &EnvContext) -> Finding {
    match exec::resolve_in(crate::extensions::EDITOR_CLI, &ctx.path) {
        Some(path) => Finding::ok("editor", format!("'code' CLI at {}", path.display())),
        None => Finding::warning(
            "editor",
            "'code' CLI not found; run \"Shell Command: Install 'code' command in PATH\" from the editor palette",
        ),
    }
}

/// The SSH agent decision procedure; may emit several findings
pub fn check_ssh_agent(ctx: &mut EnvContext, fix: bool) -> Vec<Finding> {
    const CAT: &str = "ssh-agent";
    let mut findings = Vec::new();

    let vendor = ctx.home.as_deref().and_then(sshagent::discover_vendor_socket);
    match &vendor {
        Some(sock) => findings.push(Finding::ok(
            CAT,
            format!("1Password agent socket found: {}", sock.display()),
        )),
        None => findings.push(Finding::warning(
            CAT,
            "no 1Password agent socket found (the vendor agent is optional)",
        )),
    }

    if fix {
        if let Some(sock) = &vendor {
            ctx.ssh_auth_sock = Some(sock.clone());
            findings.push(Finding::ok(
                CAT,
                "SSH_AUTH_SOCK switched to the 1Password agent for this run",
            ));
        }
    }

    match &ctx.ssh_auth_sock {
        Some(active) => {
            findings.push(Finding::ok(
                CAT,
                format!("active agent socket: {}", active.display()),
            ));
            if sshagent::is_system_agent_socket(active) {
                findings.push(Finding::warning(
                    CAT,
                    "active socket is the system launchd agent; you likely want the 1Password agent",
                ));
            }
            if !sshagent::is_live_socket(active) {
                findings.push(Finding::warning(
                    CAT,
                    "active socket path does not refer to a live socket",
                ));
            }
        }
        None => findings.push(Finding::warning(CAT, "SSH_AUTH_SOCK is not set")),
    }

    if !fix {
        if let Some(sock) = &vendor {
            if ctx.ssh_auth_sock.as_ref() != Some(sock) {
                findings.push(Finding::warning(
                    CAT,
                    "active socket is not the 1Password agent; re-run with --fix-ssh to select it",
                ));
            }
        }
    }

    let identities = sshagent::query_identities(ctx.ssh_auth_sock.as_deref());
    findings.push(match identities {
        IdentityStatus::CommandMissing => {
            Finding::warning(CAT, "ssh-add not found on PATH; cannot query identities")
        }
        IdentityStatus::Unreachable => Finding::warning(CAT, "SSH agent is unreachable"),
        IdentityStatus::NoIdentities => {
            if vendor.is_some() {
                Finding::warning(
                    CAT,
                    "agent has no identities; enable the SSH agent in 1Password settings",
                )
            } else {
                Finding::warning(CAT, "agent has no identities; load one with 'ssh-add'")
            }
        }
        IdentityStatus::Loaded(count) => {
            Finding::ok(CAT, format!("{count} identit{} loaded", if count == 1 { "y" } else { "ies" }))
        }
        IdentityStatus::Unparseable => {
            Finding::warning(CAT, "could not parse the agent's identity listing")
        }
    });

    findings
}

pub fn check_git_signing() -> Finding {
    let Ok(mut cfg) = gitcfg::open_global() else {
        return Finding::warning("git", "could not open the global Git configuration");
    };
    let signing = gitcfg::read_signing(&mut cfg);
    if signing.is_complete() {
        Finding::ok("git", "SSH commit signing is configured")
    } else {
        Finding::warning(
            "git",
            "commit signing is not fully configured (gpg.format, commit.gpgsign, user.signingkey); run 'devup setup'",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn ctx_with(path: &str, home: Option<PathBuf>, sock: Option<PathBuf>) -> EnvContext {
        EnvContext {
            os: "linux".to_string(),
            path: OsString::from(path),
            home,
            ssh_auth_sock: sock,
        }
    }

    #[test]
    fn test_parse_bash_major() {
        assert_eq!(
            parse_bash_major("GNU bash, version 5.2.26(1)-release (aarch64-apple-darwin23)\n"),
            Some(5)
        );
        assert_eq!(
            parse_bash_major("GNU bash, version 3.2.57(1)-release\n"),
            Some(3)
        );
        assert_eq!(parse_bash_major("not a version banner"), None);
        assert_eq!(parse_bash_major(""), None);
    }

    #[test]
    fn test_check_os_warns_off_macos() {
        let ctx = ctx_with("", None, None);
        let finding = check_os(&ctx);
        assert_eq!(finding.severity, crate::doctor::Severity::Warning);
    }

    #[test]
    fn test_check_brew_missing_is_error() {
        let finding = check_brew(&BrewInfo::default());
        assert_eq!(finding.severity, crate::doctor::Severity::Error);
    }

    #[test]
    fn test_check_brew_prefix_failure_is_warning() {
        let brew = BrewInfo {
            binary: Some(PathBuf::from("/opt/homebrew/bin/brew")),
            prefix: None,
        };
        assert_eq!(check_brew(&brew).severity, crate::doctor::Severity::Warning);
    }

    #[test]
    fn test_check_path_duplicates_never_error() {
        let ctx = ctx_with("/usr/bin:/usr/bin:/bin", None, None);
        let finding = check_path_duplicates(&ctx);
        assert_eq!(finding.severity, crate::doctor::Severity::Warning);
        assert!(finding.message.contains("/usr/bin (2x)"));
    }

    #[test]
    fn test_check_path_precedence_skipped_without_brew() {
        let ctx = ctx_with("/usr/bin", None, None);
        let finding = check_path_precedence(&ctx, &BrewInfo::default());
        assert_eq!(finding.severity, crate::doctor::Severity::Ok);
    }

    #[test]
    fn test_check_path_precedence_warns_when_shadowed() {
        let ctx = ctx_with("/usr/bin:/opt/homebrew/bin", None, None);
        let brew = BrewInfo {
            binary: Some(PathBuf::from("/opt/homebrew/bin/brew")),
            prefix: Some(PathBuf::from("/opt/homebrew")),
        };
        let finding = check_path_precedence(&ctx, &brew);
        assert_eq!(finding.severity, crate::doctor::Severity::Warning);
    }

    #[test]
    fn test_check_path_precedence_ok_when_leading() {
        let ctx = ctx_with("/opt/homebrew/bin:/usr/bin", None, None);
        let brew = BrewInfo {
            binary: Some(PathBuf::from("/opt/homebrew/bin/brew")),
            prefix: Some(PathBuf::from("/opt/homebrew")),
        };
        let finding = check_path_precedence(&ctx, &brew);
        assert_eq!(finding.severity, crate::doctor::Severity::Ok);
    }

    #[test]
    fn test_check_editor_cli_missing_has_hint() {
        let ctx = ctx_with("", None, None);
        let finding = check_editor_cli(&ctx);
        assert_eq!(finding.severity, crate::doctor::Severity::Warning);
        assert!(finding.message.contains("Shell Command"));
    }

    #[test]
    fn test_ssh_agent_fix_overrides_active_socket() {
        use std::os::unix::net::UnixListener;

        let temp = tempfile::TempDir::new().unwrap();
        let container = temp
            .path()
            .join(sshagent::VENDOR_CONTAINER_SUBDIR)
            .join("2BUA8C4S2C.com.1password")
            .join("t");
        std::fs::create_dir_all(&container).unwrap();
        let sock = container.join("agent.sock");
        // Bind then drop: the socket inode stays but connects fail fast, so
        // the identity query cannot block the test.
        drop(UnixListener::bind(&sock).unwrap());

        // The prior active socket must not matter.
        let mut ctx = ctx_with(
            "",
            Some(temp.path().to_path_buf()),
            Some(PathBuf::from("/private/tmp/com.apple.launchd.x/Listeners")),
        );
        check_ssh_agent(&mut ctx, true);
        assert_eq!(ctx.ssh_auth_sock, Some(sock));
    }

    #[test]
    fn test_ssh_agent_no_fix_leaves_socket_and_hints() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut ctx = ctx_with("", Some(temp.path().to_path_buf()), None);
        let findings = check_ssh_agent(&mut ctx, false);
        assert_eq!(ctx.ssh_auth_sock, None);
        assert!(
            findings
                .iter()
                .any(|f| f.message.contains("SSH_AUTH_SOCK is not set"))
        );
    }

    #[test]
    fn test_ssh_agent_hint_names_fix_flag_when_vendor_differs() {
        use std::os::unix::net::UnixListener;

        let temp = tempfile::TempDir::new().unwrap();
        let container = temp
            .path()
            .join(sshagent::VENDOR_CONTAINER_SUBDIR)
            .join("2BUA8C4S2C.com.1password")
            .join("t");
        std::fs::create_dir_all(&container).unwrap();
        drop(UnixListener::bind(container.join("agent.sock")).unwrap());

        let mut ctx = ctx_with("", Some(temp.path().to_path_buf()), None);
        let findings = check_ssh_agent(&mut ctx, false);
        assert!(findings.iter().any(|f| f.message.contains("--fix-ssh")));
    }
}
