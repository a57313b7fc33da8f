//! Doctor command implementation
//!
//! Runs the full check suite and prints the report unconditionally; the exit
//! code reflects only error-classified findings.

use crate::cli::DoctorArgs;
use crate::doctor::{self, DoctorOptions, EnvContext};
use crate::error::{DevupError, Result};

/// Run the doctor command
pub fn run(args: DoctorArgs) -> Result<()> {
    let ctx = EnvContext::from_process();
    let opts = DoctorOptions {
        fix_ssh: args.fix_ssh,
    };

    let (report, _env) = doctor::run_checks(ctx, &opts);
    report.print();

    if report.is_healthy() {
        Ok(())
    } else {
        Err(DevupError::ChecksFailed {
            errors: report.error_count(),
        })
    }
}
