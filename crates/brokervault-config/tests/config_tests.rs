// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the BrokerVault configuration system.

use std::path::PathBuf;

use brokervault_config::diagnostic::ConfigError;
use brokervault_config::model::BrokerVaultConfig;
use brokervault_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[storage]
vault_file = "/tmp/bv/vault"
verification_file = "/tmp/bv/pass"
kdf_file = "/tmp/bv/kdf"

[vault]
kdf_memory_cost = 65536
kdf_iterations = 4
kdf_parallelism = 2

[shell]
log_level = "debug"
connect_timeout_secs = 3
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.vault_file, PathBuf::from("/tmp/bv/vault"));
    assert_eq!(config.storage.verification_file, PathBuf::from("/tmp/bv/pass"));
    assert_eq!(config.storage.kdf_file, PathBuf::from("/tmp/bv/kdf"));
    assert_eq!(config.vault.kdf_iterations, 4);
    assert_eq!(config.vault.kdf_parallelism, 2);
    assert_eq!(config.shell.log_level, "debug");
    assert_eq!(config.shell.connect_timeout_secs, 3);
}

/// Missing sections fall back to compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = BrokerVaultConfig::default();

    assert_eq!(config.storage.vault_file, defaults.storage.vault_file);
    assert_eq!(config.vault.kdf_memory_cost, 65536);
    assert_eq!(config.vault.kdf_iterations, 3);
    assert_eq!(config.vault.kdf_parallelism, 4);
    assert_eq!(config.shell.log_level, "info");
    assert_eq!(config.shell.connect_timeout_secs, 10);
}

/// Default storage files keep the legacy dot-file names.
#[test]
fn default_storage_paths_use_legacy_names() {
    let config = BrokerVaultConfig::default();
    assert!(config.storage.vault_file.ends_with(".mqttBrokerData"));
    assert!(config.storage.verification_file.ends_with(".mqttBrokerDataPass"));
    assert!(config.storage.kdf_file.ends_with(".mqttBrokerDataKdf"));
}

/// Unknown top-level sections are rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[broker]
host = "localhost"
"#;
    let err = load_config_from_str(toml).expect_err("unknown section should fail");
    assert!(format!("{err}").contains("broker"));
}

/// Unknown key in [storage] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[storage]
vault_fiel = "/tmp/x"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "vault_fiel"
                && suggestion.as_deref() == Some("vault_file")
                && valid_keys.contains("verification_file")
        })
    });
    assert!(found, "expected UnknownKey for vault_fiel, got: {errors:?}");
}

/// Wrong value types produce InvalidType with the dotted key.
#[test]
fn diagnostic_invalid_type_names_the_key() {
    let toml = r#"
[vault]
kdf_iterations = "many"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::InvalidType { key, .. } if key.ends_with("kdf_iterations"))
    });
    assert!(found, "expected InvalidType for vault.kdf_iterations, got: {errors:?}");
}

/// Semantic validation runs after successful deserialization.
#[test]
fn validation_rejects_weak_kdf() {
    let toml = r#"
[vault]
kdf_memory_cost = 1024
"#;

    let errors = load_and_validate_str(toml).expect_err("weak KDF should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_memory_cost"))
    ));
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "log_levl".to_string(),
        suggestion: Some("log_level".to_string()),
        valid_keys: "log_level, connect_timeout_secs".to_string(),
        span: None,
        src: None,
    };

    let mut buf = String::new();
    let diagnostic: &dyn Diagnostic = &error;
    GraphicalReportHandler::new()
        .render_report(&mut buf, diagnostic)
        .expect("rendering should succeed");
    assert!(buf.contains("log_levl"));
    assert!(buf.contains("did you mean"));
}

/// A config file on disk is loaded and validated, env overrides applied on top.
#[test]
#[serial]
fn load_from_path_applies_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brokervault.toml");
    std::fs::write(
        &path,
        "[shell]\nlog_level = \"warn\"\nconnect_timeout_secs = 5\n",
    )
    .unwrap();

    // SAFETY: test-only env mutation, serialized with #[serial].
    unsafe { std::env::set_var("BROKERVAULT_SHELL_CONNECT_TIMEOUT_SECS", "7") };
    let result = load_and_validate_path(&path);
    unsafe { std::env::remove_var("BROKERVAULT_SHELL_CONNECT_TIMEOUT_SECS") };

    let config = result.expect("config should load");
    assert_eq!(config.shell.log_level, "warn");
    assert_eq!(config.shell.connect_timeout_secs, 7);
}

/// The master password env var is never treated as a config key.
#[test]
#[serial]
fn master_password_env_var_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brokervault.toml");
    std::fs::write(&path, "").unwrap();

    unsafe { std::env::set_var("BROKERVAULT_MASTER_PASSWORD", "hunter2") };
    let result = load_and_validate_path(&path);
    unsafe { std::env::remove_var("BROKERVAULT_MASTER_PASSWORD") };

    assert!(result.is_ok(), "master password must not reach config: {result:?}");
}
