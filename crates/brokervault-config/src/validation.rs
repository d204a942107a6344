// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, distinct vault files and Argon2id cost ranges.

use std::collections::HashSet;
use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::BrokerVaultConfig;

/// Largest `vault.kdf_memory_cost` in KiB (4 GiB).
pub const MAX_KDF_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Largest `vault.kdf_iterations` and `vault.kdf_parallelism`.
pub const MAX_KDF_PASSES: u32 = 64;

/// Accepted values for `shell.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BrokerVaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let files: [(&str, &Path); 3] = [
        ("storage.vault_file", &config.storage.vault_file),
        ("storage.verification_file", &config.storage.verification_file),
        ("storage.kdf_file", &config.storage.kdf_file),
    ];

    for (key, path) in &files {
        if path.as_os_str().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    // The three files must be distinct or one would overwrite another.
    let mut seen = HashSet::new();
    for (key, path) in &files {
        if !path.as_os_str().is_empty() && !seen.insert(*path) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{key} `{}` is already used by another storage file",
                    path.display()
                ),
            });
        }
    }

    // Validate vault KDF parameters
    if !(32768..=MAX_KDF_MEMORY_COST).contains(&config.vault.kdf_memory_cost) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be between 32768 (32 MiB) and \
                 {MAX_KDF_MEMORY_COST} (4 GiB), got {}",
                config.vault.kdf_memory_cost
            ),
        });
    }

    if !(2..=MAX_KDF_PASSES).contains(&config.vault.kdf_iterations) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be between 2 and {MAX_KDF_PASSES}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if !(1..=MAX_KDF_PASSES).contains(&config.vault.kdf_parallelism) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_parallelism must be between 1 and {MAX_KDF_PASSES}, got {}",
                config.vault.kdf_parallelism
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.shell.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "shell.log_level `{}` is not one of: {}",
                config.shell.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.shell.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "shell.connect_timeout_secs must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
