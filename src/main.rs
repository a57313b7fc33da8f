//! devup - development environment bootstrapper
//!
//! A command line tool that links editor configuration out of a dotfiles
//! checkout, installs a fixed list of editor extensions, optionally
//! configures Git SSH commit signing, and diagnoses Homebrew/PATH/SSH-agent/
//! Git state.

use clap::Parser;

mod cli;
mod commands;
mod common;
mod doctor;
mod error;
mod extensions;
mod gitcfg;
mod linker;
mod sshagent;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup => commands::setup::run(cli.dotfiles, cli.verbose),
        Commands::Doctor(args) => commands::doctor::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
