// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for BrokerVault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level BrokerVault configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerVaultConfig {
    /// Locations of the vault, verification record and KDF header files.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key derivation settings used when a vault is first created.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// On-disk file locations.
///
/// Defaults live in the user's home directory and keep the legacy dot-file
/// names so an existing installation is found in the same place.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Encrypted profile collection.
    #[serde(default = "default_vault_file")]
    pub vault_file: PathBuf,

    /// Digest used to check the master password before decrypting.
    #[serde(default = "default_verification_file")]
    pub verification_file: PathBuf,

    /// Argon2id salt and parameters for this installation.
    #[serde(default = "default_kdf_file")]
    pub kdf_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            verification_file: default_verification_file(),
            kdf_file: default_kdf_file(),
        }
    }
}

fn home_file(name: &str) -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn default_vault_file() -> PathBuf {
    home_file(".mqttBrokerData")
}

fn default_verification_file() -> PathBuf {
    home_file(".mqttBrokerDataPass")
}

fn default_kdf_file() -> PathBuf {
    home_file(".mqttBrokerDataKdf")
}

/// Credential vault configuration.
///
/// Only consulted when a new installation is bootstrapped; afterwards the
/// parameters recorded in the KDF header win.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds to wait for a broker to accept a TCP connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}
