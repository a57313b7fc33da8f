use clap::Parser;

/// Arguments for the doctor command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Diagnose without touching anything:\n    devup doctor\n\n\
                  Select the 1Password agent socket for this run:\n    devup doctor --fix-ssh")]
pub struct DoctorArgs {
    /// Force SSH_AUTH_SOCK to the 1Password agent socket for this run
    #[arg(long = "fix-ssh")]
    pub fix_ssh: bool,
}
