// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password verification.
//!
//! The gate owns two small files: the KDF header (salt and Argon2id cost,
//! fixed at bootstrap) and the verification record, a SHA-256 digest of the
//! verifier half of the derived key material. A candidate password is
//! accepted only when its recomputed digest matches the record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use brokervault_core::VaultError;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::atomic::{write_atomic, StagedFile};
use crate::kdf::{DerivedKeys, KdfHeader, KdfParams};

/// Size of the verification record on disk.
pub const RECORD_LEN: usize = 32;

/// Domain separation prefix mixed into the record digest.
const RECORD_CONTEXT: &[u8] = b"brokervault.verification.v1";

/// Checks candidate passwords against the stored verification record.
#[derive(Debug, Clone)]
pub struct PasswordGate {
    verification_file: PathBuf,
    kdf_file: PathBuf,
    params: KdfParams,
}

impl PasswordGate {
    /// `params` only applies when [`PasswordGate::bootstrap`] writes a new
    /// KDF header. Existing installations keep the parameters they were
    /// created with.
    pub fn new(
        verification_file: impl Into<PathBuf>,
        kdf_file: impl Into<PathBuf>,
        params: KdfParams,
    ) -> Self {
        Self {
            verification_file: verification_file.into(),
            kdf_file: kdf_file.into(),
            params,
        }
    }

    pub fn verification_file(&self) -> &Path {
        &self.verification_file
    }

    pub fn kdf_file(&self) -> &Path {
        &self.kdf_file
    }

    /// Whether a verification record exists for this installation.
    pub fn is_initialized(&self) -> bool {
        self.verification_file.is_file()
    }

    /// Create the verification record for `initial` if none exists yet.
    ///
    /// Returns `true` when a record was written, `false` when the
    /// installation was already initialized (the existing record is left
    /// untouched).
    pub fn bootstrap(&self, initial: &SecretString) -> Result<bool, VaultError> {
        if self.is_initialized() {
            debug!("verification record already present, skipping bootstrap");
            return Ok(false);
        }

        // A header without a record is left over from an interrupted
        // bootstrap. Nothing can have been encrypted under it, so reuse it.
        let header = match self.read_header_if_present()? {
            Some(header) => header,
            None => {
                let header = KdfHeader::generate(self.params)?;
                write_atomic(&self.kdf_file, &header.to_bytes()?)?;
                header
            }
        };

        let keys = header.derive(initial.expose_secret().as_bytes())?;
        write_atomic(&self.verification_file, &record_digest(keys.verifier()))?;

        info!(
            path = %self.verification_file.display(),
            "master password created"
        );
        Ok(true)
    }

    /// Check `candidate` against the stored record.
    ///
    /// A wrong password is `Ok(false)`; a missing or malformed record is an
    /// error.
    pub fn verify(&self, candidate: &SecretString) -> Result<bool, VaultError> {
        match self.unlock(candidate) {
            Ok(_) => Ok(true),
            Err(VaultError::InvalidPassword) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Verify `candidate` and hand back the derived keys on success.
    pub fn unlock(&self, candidate: &SecretString) -> Result<DerivedKeys, VaultError> {
        let record = self.read_record()?;
        let keys = self.derive(candidate)?;

        if constant_time_eq(&record_digest(keys.verifier()), &record) {
            debug!("master password verified");
            Ok(keys)
        } else {
            debug!("master password rejected");
            Err(VaultError::InvalidPassword)
        }
    }

    /// Replace the verification record with one for `new_password`.
    ///
    /// This does not re-encrypt the vault. On a non-empty vault it leaves
    /// the payload under the old key and therefore unreadable; use
    /// `VaultStore::change_password` for that case.
    pub fn reset(&self, new_password: &SecretString) -> Result<(), VaultError> {
        self.read_record()?;
        let keys = self.derive(new_password)?;
        self.stage_record(&keys)?.commit()?;
        info!("verification record replaced");
        Ok(())
    }

    /// Derive keys for `password` under the installation header.
    pub(crate) fn derive(&self, password: &SecretString) -> Result<DerivedKeys, VaultError> {
        let header = self.read_header_if_present()?.ok_or_else(|| {
            if self.is_initialized() {
                VaultError::CorruptRecord(format!(
                    "KDF header {} is missing",
                    self.kdf_file.display()
                ))
            } else {
                VaultError::NotInitialized
            }
        })?;
        header.derive(password.expose_secret().as_bytes())
    }

    /// Write the record for `keys` to a temp file without replacing the
    /// current one.
    pub(crate) fn stage_record(&self, keys: &DerivedKeys) -> Result<StagedFile, VaultError> {
        StagedFile::stage(&self.verification_file, &record_digest(keys.verifier()))
    }

    fn read_record(&self) -> Result<[u8; RECORD_LEN], VaultError> {
        let bytes = match std::fs::read(&self.verification_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(VaultError::NotInitialized),
            Err(e) => return Err(VaultError::io(&self.verification_file, e)),
        };

        bytes.try_into().map_err(|bytes: Vec<u8>| {
            VaultError::CorruptRecord(format!(
                "expected {RECORD_LEN} bytes, found {}",
                bytes.len()
            ))
        })
    }

    fn read_header_if_present(&self) -> Result<Option<KdfHeader>, VaultError> {
        match std::fs::read(&self.kdf_file) {
            Ok(bytes) => KdfHeader::from_bytes(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::io(&self.kdf_file, e)),
        }
    }
}

fn record_digest(verifier: &[u8]) -> [u8; RECORD_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(RECORD_CONTEXT);
    hasher.update(verifier);

    let mut out = [0u8; RECORD_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compare two byte strings without exiting early on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
