// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./brokervault.toml` > `~/.config/brokervault/brokervault.toml`
//! > `/etc/brokervault/brokervault.toml` with environment variable overrides via
//! `BROKERVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BrokerVaultConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/brokervault/brokervault.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "brokervault.toml";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "BROKERVAULT_";

/// Env var (after prefix stripping) that carries the master password and must
/// never reach the config model.
const MASTER_PASSWORD_KEY: &str = "master_password";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/brokervault/brokervault.toml` (system-wide)
/// 3. `~/.config/brokervault/brokervault.toml` (user XDG config)
/// 4. `./brokervault.toml` (local directory)
/// 5. `BROKERVAULT_*` environment variables
pub fn load_config() -> Result<BrokerVaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BrokerVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokerVaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BrokerVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokerVaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BrokerVaultConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/brokervault/brokervault.toml` on Linux, platform equivalent elsewhere.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("brokervault").join(LOCAL_CONFIG_FILE))
}

/// Config sections addressable from environment variables.
const ENV_SECTIONS: &[&str] = &["storage", "vault", "shell"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")`: `BROKERVAULT_STORAGE_VAULT_FILE` must
/// map to `storage.vault_file`, not `storage.vault.file`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&[MASTER_PASSWORD_KEY])
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Turn the first `_` after a known section name into a `.`.
///
/// Only the leading section is rewritten, so underscores inside key names
/// survive: `storage_vault_file` -> `storage.vault_file`.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_prefix_becomes_dot() {
        assert_eq!(map_env_key("shell_log_level"), "shell.log_level");
        assert_eq!(map_env_key("vault_kdf_iterations"), "vault.kdf_iterations");
    }

    #[test]
    fn only_leading_section_is_rewritten() {
        assert_eq!(map_env_key("storage_vault_file"), "storage.vault_file");
        assert_eq!(map_env_key("storage_kdf_file"), "storage.kdf_file");
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(map_env_key("bogus"), "bogus");
    }
}
