// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opening and unlocking the vault at startup.

use brokervault_config::model::BrokerVaultConfig;
use brokervault_core::{VaultCollection, VaultError};
use brokervault_vault::{
    get_new_password_with_confirm, password_from_env, read_password, KdfParams, VaultPaths,
    VaultStore,
};
use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};

/// Open the store at the configured paths.
pub fn open_store(config: &BrokerVaultConfig) -> Result<VaultStore, VaultError> {
    VaultStore::open(
        VaultPaths::from(&config.storage),
        KdfParams::from(&config.vault),
    )
}

/// Create the master password on first run. Returns whether one was created.
pub fn ensure_initialized(store: &VaultStore) -> Result<bool, VaultError> {
    if store.gate().is_initialized() {
        return Ok(false);
    }

    println!("No master password is set. Choose one to create the vault.");
    let password = get_new_password_with_confirm()?;
    let created = store.gate().bootstrap(&password)?;
    if created {
        println!("{}", "Master password created.".green());
    }
    Ok(created)
}

/// Obtain the master password and load the collection.
///
/// With `BROKERVAULT_MASTER_PASSWORD` set there is exactly one attempt.
/// Interactively, a wrong or empty password re-prompts; any other failure
/// aborts.
pub fn unlock(store: &VaultStore) -> Result<(VaultCollection, SecretString), VaultError> {
    if let Some(password) = password_from_env() {
        let collection = open_with(store, &password)?;
        return Ok((collection, password));
    }

    unlock_with(store, || read_password("Master password: "))
}

/// Keep asking `next_password` until one opens the vault.
fn unlock_with(
    store: &VaultStore,
    mut next_password: impl FnMut() -> Result<SecretString, VaultError>,
) -> Result<(VaultCollection, SecretString), VaultError> {
    loop {
        let password = next_password()?;
        if password.expose_secret().is_empty() {
            eprintln!("{}", "Password must not be empty, try again.".yellow());
            continue;
        }
        match open_with(store, &password) {
            Ok(collection) => return Ok((collection, password)),
            Err(VaultError::InvalidPassword) => {
                eprintln!("{}", "Invalid password, try again.".yellow());
            }
            Err(e) => return Err(e),
        }
    }
}

/// Check the password against the gate, then load.
///
/// The explicit gate check matters for an empty vault file, which `load`
/// accepts under any password.
fn open_with(store: &VaultStore, password: &SecretString) -> Result<VaultCollection, VaultError> {
    if !store.gate().verify(password)? {
        return Err(VaultError::InvalidPassword);
    }
    store.load(password)
}
