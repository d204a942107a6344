// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `init`, `list` and `passwd`.

use brokervault_config::model::BrokerVaultConfig;
use brokervault_core::VaultError;
use brokervault_vault::{password_from_env, prompt_new_password};
use colored::Colorize;

use crate::session;
use crate::shell::print_profiles;

/// Create the master password if this installation has none.
pub fn run_init(config: &BrokerVaultConfig) -> Result<(), VaultError> {
    let store = session::open_store(config)?;
    if !session::ensure_initialized(&store)? {
        println!("Vault already initialized at {}", store.path().display());
    }
    Ok(())
}

/// Print the stored brokers and exit.
pub fn run_list(config: &BrokerVaultConfig) -> Result<(), VaultError> {
    let store = session::open_store(config)?;
    if !store.gate().is_initialized() {
        return Err(VaultError::NotInitialized);
    }
    let (collection, _password) = session::unlock(&store)?;
    print_profiles(collection.profiles());
    Ok(())
}

/// Re-encrypt the vault under a new master password.
///
/// The new password is always read from the terminal; the environment
/// variable only supplies the current one.
pub fn run_passwd(config: &BrokerVaultConfig) -> Result<(), VaultError> {
    let store = session::open_store(config)?;
    if !store.gate().is_initialized() {
        return Err(VaultError::NotInitialized);
    }
    let (_collection, current) = session::unlock(&store)?;
    if password_from_env().is_some() {
        eprintln!(
            "{}",
            "note: current password taken from BROKERVAULT_MASTER_PASSWORD".dimmed()
        );
    }

    let new_password = prompt_new_password()?;
    let collection = store.change_password(&current, &new_password)?;
    println!(
        "{} ({} brokers re-encrypted)",
        "Master password changed.".green(),
        collection.len()
    );
    Ok(())
}
