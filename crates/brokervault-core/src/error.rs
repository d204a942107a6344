// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BrokerVault credential vault.

use std::path::PathBuf;

use thiserror::Error;

/// The error type shared by every BrokerVault crate.
///
/// The first four variants form the vault failure taxonomy callers are
/// expected to match on: a gate rejection, an AEAD tag mismatch, a payload
/// that decrypted but does not parse, and filesystem failures.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The candidate password does not match the stored verification record.
    #[error("invalid password")]
    InvalidPassword,

    /// The AEAD tag did not verify: wrong key, corrupted or truncated file.
    #[error("authentication failed -- vault is corrupted or was encrypted under a different key")]
    AuthenticationFailure,

    /// Decryption succeeded but the payload is not a valid profile collection.
    #[error("corrupt vault: {0}")]
    CorruptVault(String),

    /// The verification record or KDF header on disk is malformed.
    #[error("corrupt verification record: {0}")]
    CorruptRecord(String),

    /// No master password has been created for this installation yet.
    #[error("vault is not initialized -- create a master password first")]
    NotInitialized,

    /// Filesystem error while reading or writing one of the vault files.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Argon2id parameter or hashing failure.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Cipher or RNG failure unrelated to authentication.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A user-supplied profile failed validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// No profile at the requested position.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// New password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The connect collaborator could not reach the broker.
    #[error("connection error: {message}")]
    Connect {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors detected at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Wrap an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
