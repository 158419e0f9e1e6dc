//! Basic binary invocation tests (assert_cmd).

mod common;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn mailtask_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("mailtask");
    cmd.env_remove("MAILTASK_CONFIG")
        .env_remove("MAILTASK_MAILDIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let mut cmd = mailtask_cmd();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mailtask"));
}

#[test]
fn test_cli_help() {
    let mut cmd = mailtask_cmd();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Compile inbox task descriptors"));
}

#[test]
fn test_cli_no_args_shows_error() {
    let mut cmd = mailtask_cmd();
    cmd.assert().failure();
}

#[test]
fn test_cli_build_requires_input() {
    let mut cmd = mailtask_cmd();
    cmd.arg("build");
    cmd.assert().failure();
}

#[test]
fn test_cli_build_to_stdout() {
    let (_mail, root) = common::temp_maildir();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("task.md");
    std::fs::write(&input, "## t\nmessages:\n- raw-list: allen-p/inbox/1.\n").unwrap();

    let mut cmd = mailtask_cmd();
    cmd.arg("--maildir").arg(&root).arg("build").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"allen-p/inbox/1.\""))
        .stdout(predicate::str::contains("\"read\":false"));
}

#[test]
fn test_cli_maildir_from_env() {
    let (_mail, root) = common::temp_maildir();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("task.md");
    std::fs::write(&input, "## t\nmessages:\n- allen-p/inbox@~1:\n").unwrap();

    let mut cmd = mailtask_cmd();
    cmd.env("MAILTASK_MAILDIR", &root).arg("build").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("allen-p/inbox/1."));
}

#[test]
fn test_cli_build_grammar_error_reports_line() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("bad.md");
    std::fs::write(&input, "## t\ntitle: x\n- stray\n").unwrap();

    let mut cmd = mailtask_cmd();
    cmd.current_dir(tmp.path()).arg("build").arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_cli_config_recipient_limit() {
    let (_mail, root) = common::temp_maildir();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("task.md");
    std::fs::write(&input, "## t\nmessages:\n- raw-list: allen-p/inbox/10.\n").unwrap();
    let config = tmp.path().join("mailtask.toml");
    std::fs::write(
        &config,
        format!(
            "maildir = \"{}\"\n\n[resolve]\nrecipient_limit = 1\n",
            root.display()
        ),
    )
    .unwrap();

    let mut cmd = mailtask_cmd();
    cmd.current_dir(tmp.path()).arg("build").arg(&input);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let to = json["sessions"][0]["messages"][0]["to"].as_array().unwrap();
    assert_eq!(to.len(), 1);
}

#[test]
fn test_cli_missing_config_file_fails() {
    let mut cmd = mailtask_cmd();
    cmd.args(["--config", "/nonexistent/mailtask.toml", "scan"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_cli_assemble() {
    let (_cfg, config_dir) = common::temp_config_dir(6);
    let out = TempDir::new().unwrap();

    let mut cmd = mailtask_cmd();
    cmd.arg("assemble")
        .arg(&config_dir)
        .arg("-o")
        .arg(out.path())
        .args(["-s", "3", "-n", "2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Writing file config-commitment-1.md"))
        .stdout(predicate::str::contains("0\tinbox-"));
    assert!(out.path().join("config-commitment-0.md").is_file());
    assert!(!out.path().join("config-commitment-2.md").exists());
}

#[test]
fn test_cli_scan() {
    let (_mail, root) = common::temp_maildir();

    let mut cmd = mailtask_cmd();
    cmd.arg("--maildir")
        .arg(&root)
        .args(["scan", "--min-size", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("allen-p"));
}
