use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn command(temp: &TempDir) -> Command {
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        format!("output_dir = {:?}\n", temp.path().join("repos").display().to_string()),
    )
    .expect("failed to write config");

    let mut cmd = Command::cargo_bin("repo-documenter").expect("binary not found");
    cmd.current_dir(temp.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("--log-file")
        .arg(temp.path().join("run.log"));
    cmd
}

#[test]
fn missing_github_token_is_fatal() {
    let temp = TempDir::new().expect("failed to create temp dir");

    command(&temp)
        .arg("https://github.com/acme")
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));

    // Nothing was cloned
    assert!(!temp.path().join("repos").join("acme").exists());
}

#[test]
fn missing_generation_key_is_fatal_only_when_documenting() {
    let temp = TempDir::new().expect("failed to create temp dir");

    command(&temp)
        .env("GITHUB_TOKEN", "ghp_test")
        .arg("acme")
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn invalid_organization_is_rejected() {
    let temp = TempDir::new().expect("failed to create temp dir");

    command(&temp)
        .env("GITHUB_TOKEN", "ghp_test")
        .env("ANTHROPIC_API_KEY", "sk-test")
        .arg("https://github.com/")
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid GitHub organization URL"));
}

#[test]
fn unattended_run_requires_yes() {
    let temp = TempDir::new().expect("failed to create temp dir");

    command(&temp)
        .env("GITHUB_TOKEN", "ghp_test")
        .env("ANTHROPIC_API_KEY", "sk-test")
        .arg("acme")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn log_file_receives_plain_lines() {
    let temp = TempDir::new().expect("failed to create temp dir");

    command(&temp).arg("acme").arg("--yes").assert().failure();

    let log = fs::read_to_string(temp.path().join("run.log")).expect("log file missing");
    assert!(log.contains("Invalid configuration"));
    assert!(!log.contains("\u{1b}["));
}

#[test]
fn help_lists_options() {
    Command::cargo_bin("repo-documenter")
        .expect("binary not found")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--clone-only"))
        .stdout(predicate::str::contains("--repos"));
}
