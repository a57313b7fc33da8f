//! Common test utilities for devup integration tests

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// An isolated home directory plus dotfiles checkout for integration tests
#[allow(dead_code)]
pub struct TestEnv {
    /// Temporary directory backing everything below
    pub temp: TempDir,
    /// Fake home directory
    pub home: PathBuf,
    /// Dotfiles repository root
    pub dotfiles: PathBuf,
    /// Directory of fake external binaries, placed on the child's PATH
    pub bin: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let home = temp.path().join("home");
        let dotfiles = temp.path().join("dotfiles");
        // The fake Homebrew prefix is the parent of the bin directory so the
        // PATH precedence check can be satisfied.
        let bin = temp.path().join("homebrew").join("bin");
        std::fs::create_dir_all(&home).expect("Failed to create home");
        std::fs::create_dir_all(&dotfiles).expect("Failed to create dotfiles");
        std::fs::create_dir_all(&bin).expect("Failed to create bin");
        Self {
            temp,
            home,
            dotfiles,
            bin,
        }
    }

    /// The fake Homebrew prefix matching [`TestEnv::bin`]
    pub fn brew_prefix(&self) -> PathBuf {
        self.temp.path().join("homebrew")
    }

    /// Editor user-config directory below the fake home
    pub fn editor_user_dir(&self) -> PathBuf {
        #[cfg(target_os = "macos")]
        let config = self.home.join("Library").join("Application Support");
        #[cfg(not(target_os = "macos"))]
        let config = self.home.join(".config");
        config.join("Code").join("User")
    }

    /// Write a file below the dotfiles checkout
    pub fn write_dotfile(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dotfiles.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Install an executable shell script into the fake bin directory
    pub fn write_fake_bin(&self, name: &str, body: &str) {
        let path = self.bin.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark script executable");
    }

    /// Install the standard set of healthy fake externals
    pub fn with_healthy_tools(self) -> Self {
        self.write_fake_bin(
            "bash",
            "echo 'GNU bash, version 5.2.26(1)-release (x86_64-pc-linux-gnu)'",
        );
        self.write_fake_bin(
            "brew",
            &format!(
                "if [ \"$1\" = \"--prefix\" ]; then echo '{}'; fi",
                self.brew_prefix().display()
            ),
        );
        self.write_fake_bin("python3", "echo fake python");
        self.write_fake_bin("code", "exit 0");
        self.write_fake_bin("ssh-add", "echo 'The agent has no identities.' ; exit 1");
        self
    }

    /// A complete global Git configuration, so setup never prompts
    pub fn with_complete_gitconfig(self) -> Self {
        let content = "[gpg]\n\tformat = ssh\n[commit]\n\tgpgsign = true\n[user]\n\tsigningkey = ssh-ed25519 AAAAC3Nza\n\tname = Test User\n\temail = test@example.com\n";
        std::fs::write(self.home.join(".gitconfig"), content).expect("Failed to write gitconfig");
        self
    }
}
