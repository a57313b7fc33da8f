//! Setup command integration tests
//!
//! Runs the real binary against a synthetic HOME, dotfiles checkout and PATH.
//! The fake global Git configuration is complete so no interactive prompt is
//! ever reached.

mod common;

use assert_cmd::Command;
use common::TestEnv;
use predicates::prelude::*;

fn setup_cmd(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("devup").unwrap();
    cmd.args(["--dotfiles"])
        .arg(&env.dotfiles)
        .arg("setup")
        .env("HOME", &env.home)
        .env("PATH", &env.bin)
        .env_remove("SSH_AUTH_SOCK")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DEVUP_DOTFILES");
    cmd
}

#[test]
fn test_missing_resource_dir_aborts_before_linking() {
    let env = TestEnv::new().with_complete_gitconfig();
    setup_cmd(&env)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dotfiles directory not found"));
    assert!(!env.editor_user_dir().exists());
}

#[test]
fn test_missing_settings_resource_aborts() {
    let env = TestEnv::new().with_complete_gitconfig();
    std::fs::create_dir_all(env.dotfiles.join("vscode")).unwrap();
    setup_cmd(&env)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required resource missing"));
}

#[test]
fn test_links_settings_and_creates_default_keybindings() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    let settings = env.write_dotfile("vscode/settings.json", "{\"editor.fontSize\": 13}");

    setup_cmd(&env).assert().success();

    let linked_settings = env.editor_user_dir().join("settings.json");
    assert_eq!(std::fs::read_link(&linked_settings).unwrap(), settings);

    // The keybindings resource was seeded into the repo and linked.
    let repo_keybindings = env.dotfiles.join("vscode/keybindings.json");
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&repo_keybindings).unwrap()).unwrap();
    assert_eq!(parsed, serde_json::Value::Array(Vec::new()));
    assert_eq!(
        std::fs::read_link(env.editor_user_dir().join("keybindings.json")).unwrap(),
        repo_keybindings
    );
}

#[test]
fn test_second_run_reports_already_linked_without_backups() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{}");

    setup_cmd(&env).assert().success();
    setup_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("already linked"));

    let backups: Vec<_> = std::fs::read_dir(env.editor_user_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".bak."))
        .collect();
    assert!(backups.is_empty(), "idempotent re-run must not create backups");
}

#[test]
fn test_existing_settings_file_is_backed_up() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{\"new\": true}");

    let user_dir = env.editor_user_dir();
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(user_dir.join("settings.json"), "{\"old\": true}").unwrap();

    setup_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("previous saved as"));

    let backups: Vec<_> = std::fs::read_dir(&user_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("settings.json.bak.")
        })
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        std::fs::read_to_string(backups[0].path()).unwrap(),
        "{\"old\": true}"
    );
}

#[test]
fn test_missing_extension_list_is_only_a_notice() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{}");

    setup_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("no extension list"));
}

#[test]
fn test_extension_failures_do_not_fail_the_run() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{}");
    env.write_dotfile(
        "vscode/extensions.txt",
        "# core\nrust-lang.rust-analyzer\n\nbroken.extension\n",
    );
    // The fake editor CLI rejects one identifier and accepts the rest.
    env.write_fake_bin(
        "code",
        "if [ \"$2\" = \"broken.extension\" ]; then exit 1; fi",
    );

    setup_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 installed, 1 failed"));
}

#[test]
fn test_setup_runs_doctor_report() {
    let env = TestEnv::new().with_healthy_tools().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{}");

    setup_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("Doctor"))
        .stdout(predicate::str::contains("exit code"));
}

#[test]
fn test_setup_exits_zero_despite_doctor_errors() {
    // Empty PATH makes the Homebrew check an error inside the doctor, but
    // setup still completes with exit 0.
    let env = TestEnv::new().with_complete_gitconfig();
    env.write_dotfile("vscode/settings.json", "{}");

    let mut cmd = Command::cargo_bin("devup").unwrap();
    cmd.args(["--dotfiles"])
        .arg(&env.dotfiles)
        .arg("setup")
        .env("HOME", &env.home)
        .env("PATH", "")
        .env_remove("SSH_AUTH_SOCK")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DEVUP_DOTFILES")
        .assert()
        .success()
        .stdout(predicate::str::contains("exit code 1"));
}
