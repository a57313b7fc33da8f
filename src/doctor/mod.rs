//! Environment diagnostics
//!
//! A read-mostly sequence of independent checks against the host, each
//! classified ok/warning/error and collected into a [`Report`]. Checks run in
//! a fixed order, once per run; no check's classification depends on another
//! check's outcome, and findings are never reclassified after being recorded.
//!
//! All environment observations go through an explicit [`EnvContext`]
//! snapshot. The one corrective action (`--fix-ssh`) mutates the context, not
//! the process environment; the modified context is handed back to the caller
//! to decide whether the override outlives this run.

pub mod checks;

use std::ffi::OsString;
use std::path::PathBuf;

use console::Style;

pub use checks::DoctorOptions;

/// Classification of one finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// One diagnostic check's classified result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn ok(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Ok,
            message: message.into(),
        }
    }

    pub fn warning(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Snapshot of the environment the checks observe
#[derive(Debug, Clone)]
pub struct EnvContext {
    /// Host OS family (`std::env::consts::OS` value)
    pub os: String,
    /// The process search path
    pub path: OsString,
    /// The user's home directory
    pub home: Option<PathBuf>,
    /// The active SSH agent socket; overridden in place by `--fix-ssh`
    pub ssh_auth_sock: Option<PathBuf>,
}

impl EnvContext {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            path: std::env::var_os("PATH").unwrap_or_default(),
            home: dirs::home_dir(),
            ssh_auth_sock: std::env::var_os("SSH_AUTH_SOCK")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Aggregated findings of one doctor run
#[derive(Debug, Default)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Failure iff at least one finding is an error
    pub fn is_healthy(&self) -> bool {
        self.error_count() == 0
    }

    /// Print every finding in recorded order, then the summary line
    pub fn print(&self) {
        for finding in &self.findings {
            let marker = match finding.severity {
                Severity::Ok => Style::new().green().apply_to("✓"),
                Severity::Warning => Style::new().yellow().bold().apply_to("!"),
                Severity::Error => Style::new().red().bold().apply_to("✗"),
            };
            println!(
                "  {marker} {} {}",
                Style::new().bold().apply_to(format!("{}:", finding.category)),
                finding.message
            );
        }

        let errors = self.error_count();
        let warnings = self.warning_count();
        let exit_code = if errors > 0 { 1 } else { 0 };
        println!();
        println!("{warnings} warning(s), {errors} error(s), exit code {exit_code}");
    }
}

/// Run every check in fixed order against `ctx`
///
/// Returns the report together with the (possibly `--fix-ssh` modified)
/// context.
pub fn run_checks(mut ctx: EnvContext, opts: &DoctorOptions) -> (Report, EnvContext) {
    let mut report = Report::default();

    report.push(checks::check_os(&ctx));
    report.push(checks::check_shell(&ctx));

    let brew = checks::probe_brew(&ctx);
    report.push(checks::check_brew(&brew));
    report.push(checks::check_path_duplicates(&ctx));
    report.push(checks::check_path_precedence(&ctx, &brew));
    report.push(checks::check_python_origin(&ctx, &brew));
    report.push(checks::check_editor_cli(&ctx));
    report.extend(checks::check_ssh_agent(&mut ctx, opts.fix_ssh));
    report.push(checks::check_git_signing());

    (report, ctx)
}
