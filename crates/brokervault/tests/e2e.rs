// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `brokervault` binary non-interactively.

use std::path::Path;
use std::process::{Command, Output};

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("brokervault.toml");
    let toml = format!(
        r#"
[storage]
vault_file = "{0}/vault"
verification_file = "{0}/pass"
kdf_file = "{0}/kdf"

[vault]
kdf_memory_cost = 32768
kdf_iterations = 2
kdf_parallelism = 1

[shell]
log_level = "warn"
"#,
        dir.display()
    );
    std::fs::write(&path, toml).unwrap();
    path
}

fn run(config: &Path, password: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_brokervault"));
    cmd.arg("--config").arg(config).args(args);
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    match password {
        Some(pw) => cmd.env("BROKERVAULT_MASTER_PASSWORD", pw),
        None => cmd.env_remove("BROKERVAULT_MASTER_PASSWORD"),
    };
    cmd.output().expect("binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn init_then_list_empty_vault() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let init = run(&config, Some("e2e-secret"), &["init"]);
    assert!(init.status.success(), "init failed: {}", stderr(&init));
    assert!(stdout(&init).contains("Master password created"));
    assert!(dir.path().join("vault").exists());
    assert_eq!(std::fs::read(dir.path().join("pass")).unwrap().len(), 32);

    let again = run(&config, Some("other"), &["init"]);
    assert!(again.status.success());
    assert!(stdout(&again).contains("already initialized"));

    let list = run(&config, Some("e2e-secret"), &["list"]);
    assert!(list.status.success(), "list failed: {}", stderr(&list));
    assert!(stdout(&list).contains("No brokers stored"));
}

#[test]
fn wrong_password_from_env_fails_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    assert!(run(&config, Some("right"), &["init"]).status.success());

    let list = run(&config, Some("wrong"), &["list"]);
    assert!(!list.status.success());
    assert!(stderr(&list).contains("invalid password"));
}

#[test]
fn list_before_init_reports_not_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let list = run(&config, Some("pw"), &["list"]);
    assert!(!list.status.success());
    assert!(stderr(&list).contains("not initialized"));
}

#[test]
fn invalid_config_is_rejected_before_touching_the_vault() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("brokervault.toml");
    std::fs::write(&config, "[vault]\nkdf_iteration = 3\n").unwrap();

    let output = run(&config, Some("pw"), &["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("kdf_iteration"));
}
