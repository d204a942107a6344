// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The encrypted profile collection on disk.
//!
//! The vault file holds `nonce ‖ ciphertext ‖ tag` of the JSON-encoded
//! collection. A zero-length file is the valid initial state and loads as an
//! empty collection without touching the cipher or the password gate.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use brokervault_config::model::StorageConfig;
use brokervault_core::{VaultCollection, VaultError};
use secrecy::SecretString;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::atomic::{write_atomic, StagedFile};
use crate::crypto;
use crate::gate::PasswordGate;
use crate::kdf::{DerivedKeys, KdfParams};

/// Locations of the three files that make up one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub vault_file: PathBuf,
    pub verification_file: PathBuf,
    pub kdf_file: PathBuf,
}

impl VaultPaths {
    /// The default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vault_file: dir.join(".mqttBrokerData"),
            verification_file: dir.join(".mqttBrokerDataPass"),
            kdf_file: dir.join(".mqttBrokerDataKdf"),
        }
    }
}

impl From<&StorageConfig> for VaultPaths {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            vault_file: storage.vault_file.clone(),
            verification_file: storage.verification_file.clone(),
            kdf_file: storage.kdf_file.clone(),
        }
    }
}

/// Loads and saves the profile collection behind the password gate.
#[derive(Debug)]
pub struct VaultStore {
    vault_file: PathBuf,
    gate: PasswordGate,
}

impl VaultStore {
    /// Open the store, creating an empty vault file if none exists.
    pub fn open(paths: VaultPaths, params: KdfParams) -> Result<Self, VaultError> {
        ensure_vault_file(&paths.vault_file)?;
        Ok(Self {
            gate: PasswordGate::new(paths.verification_file, paths.kdf_file, params),
            vault_file: paths.vault_file,
        })
    }

    pub fn gate(&self) -> &PasswordGate {
        &self.gate
    }

    pub fn path(&self) -> &Path {
        &self.vault_file
    }

    /// Decrypt and parse the collection.
    ///
    /// An empty vault file yields an empty collection for any password.
    /// Otherwise the gate runs first ([`VaultError::InvalidPassword`]), then
    /// decryption ([`VaultError::AuthenticationFailure`]), then parsing
    /// ([`VaultError::CorruptVault`]).
    pub fn load(&self, password: &SecretString) -> Result<VaultCollection, VaultError> {
        let data = self.read_vault()?;
        if data.is_empty() {
            debug!(path = %self.vault_file.display(), "vault file is empty");
            return Ok(VaultCollection::new());
        }

        let keys = self.gate.unlock(password)?;
        let collection = decode(&keys, &data)?;
        debug!(profiles = collection.len(), "vault loaded");
        Ok(collection)
    }

    /// Encrypt `collection` and atomically replace the vault file.
    ///
    /// `password` must pass the gate, so a mistyped password can never
    /// re-key the vault.
    pub fn save(
        &self,
        collection: &VaultCollection,
        password: &SecretString,
    ) -> Result<(), VaultError> {
        let keys = self.gate.unlock(password)?;
        let sealed = encode(&keys, collection)?;
        write_atomic(&self.vault_file, &sealed)?;
        info!(profiles = collection.len(), "vault saved");
        Ok(())
    }

    /// Re-encrypt the vault under `new` and replace the verification record.
    ///
    /// Both files are fully written and synced before either is renamed into
    /// place; the vault goes first, then the record. If the record cannot be
    /// replaced, the previous vault bytes are put back so the old password
    /// still opens it. Returns the collection that was re-encrypted.
    pub fn change_password(
        &self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<VaultCollection, VaultError> {
        let old_keys = self.gate.unlock(old)?;
        let data = self.read_vault()?;
        let collection = if data.is_empty() {
            VaultCollection::new()
        } else {
            decode(&old_keys, &data)?
        };

        let new_keys = self.gate.derive(new)?;
        let sealed = encode(&new_keys, &collection)?;
        let staged_vault = StagedFile::stage(&self.vault_file, &sealed)?;
        let staged_record = self.gate.stage_record(&new_keys)?;
        commit_rekey(staged_vault, staged_record, &data)?;

        info!(profiles = collection.len(), "master password changed");
        Ok(collection)
    }

    fn read_vault(&self) -> Result<Vec<u8>, VaultError> {
        match std::fs::read(&self.vault_file) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(VaultError::io(&self.vault_file, e)),
        }
    }
}

/// Rename the re-keyed vault, then its record.
///
/// When the record rename fails, `previous_vault` is written back so vault and
/// record agree on the old password again.
fn commit_rekey(
    vault: StagedFile,
    record: StagedFile,
    previous_vault: &[u8],
) -> Result<(), VaultError> {
    let vault_file = vault.target().to_path_buf();
    vault.commit()?;

    if let Err(e) = record.commit() {
        match write_atomic(&vault_file, previous_vault) {
            Ok(()) => warn!(
                error = %e,
                "verification record not replaced, vault restored under the old password"
            ),
            Err(restore) => warn!(
                error = %e,
                restore_error = %restore,
                path = %vault_file.display(),
                "vault is under the new password but the record is not; \
                 run a password reset with the new password to recover"
            ),
        }
        return Err(e);
    }
    Ok(())
}

fn encode(keys: &DerivedKeys, collection: &VaultCollection) -> Result<Vec<u8>, VaultError> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(collection)
            .map_err(|e| VaultError::Internal(format!("failed to serialize vault: {e}")))?,
    );
    crypto::encrypt(keys.cipher_key(), &plaintext)
}

fn decode(keys: &DerivedKeys, data: &[u8]) -> Result<VaultCollection, VaultError> {
    let plaintext = crypto::decrypt(keys.cipher_key(), data)?;
    serde_json::from_slice(&plaintext).map_err(|e| VaultError::CorruptVault(e.to_string()))
}

/// Create `path` as a zero-length, owner-only file unless it already exists.
fn ensure_vault_file(path: &Path) -> Result<(), VaultError> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| VaultError::io(dir, e))?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    match options.open(path) {
        Ok(_) => {
            info!(path = %path.display(), "created empty vault file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(VaultError::io(path, e)),
    }
}
