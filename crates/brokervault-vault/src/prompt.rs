// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or BROKERVAULT_MASTER_PASSWORD.

use brokervault_core::VaultError;
use secrecy::{ExposeSecret, SecretString};

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "BROKERVAULT_MASTER_PASSWORD";

/// The master password from the environment, if set and non-empty.
pub fn password_from_env() -> Option<SecretString> {
    match std::env::var(MASTER_PASSWORD_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

/// Read one password from the terminal without echo. The input may be empty.
///
/// Fails when stdin is not a terminal.
pub fn read_password(label: &str) -> Result<SecretString, VaultError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(VaultError::Internal(format!(
            "No password provided. Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
        )));
    }

    let password = rpassword::prompt_password(label)
        .map_err(|e| VaultError::Internal(format!("failed to read password: {e}")))?;
    Ok(SecretString::from(password))
}

/// Like [`read_password`], but empty input is an error.
pub fn prompt_password(label: &str) -> Result<SecretString, VaultError> {
    let password = read_password(label)?;
    if password.expose_secret().is_empty() {
        return Err(VaultError::Internal("empty password not allowed".to_string()));
    }
    Ok(password)
}

/// Get the master password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `BROKERVAULT_MASTER_PASSWORD` environment variable (scripts, CI)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_master_password() -> Result<SecretString, VaultError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }
    prompt_password("Master password: ")
}

/// Get a new password, prompting twice on a terminal.
///
/// The environment variable is taken as-is without confirmation.
pub fn get_new_password_with_confirm() -> Result<SecretString, VaultError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    prompt_new_password()
}

/// Prompt twice for a new password on the terminal, ignoring the environment.
pub fn prompt_new_password() -> Result<SecretString, VaultError> {
    let first = prompt_password("New master password: ")?;
    let second = prompt_password("Confirm master password: ")?;
    confirm(first, &second)
}

fn confirm(first: SecretString, second: &SecretString) -> Result<SecretString, VaultError> {
    if first.expose_secret() != second.expose_secret() {
        return Err(VaultError::PasswordMismatch);
    }
    Ok(first)
}
