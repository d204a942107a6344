// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-gated encrypted storage for MQTT broker credentials.
//!
//! The master password is stretched with Argon2id into an AES-256-GCM key
//! and a verifier. The verifier's digest gates every access before anything
//! is decrypted; the key seals the JSON-encoded profile collection, which is
//! replaced atomically on every save.

pub mod atomic;
pub mod crypto;
pub mod gate;
pub mod kdf;
pub mod mask;
pub mod prompt;
pub mod repository;
pub mod store;

pub use gate::PasswordGate;
pub use kdf::{DerivedKeys, KdfHeader, KdfParams};
pub use mask::mask_secret;
pub use prompt::{
    get_master_password, get_new_password_with_confirm, password_from_env, prompt_new_password,
    prompt_password, read_password,
};
pub use repository::CredentialRepository;
pub use store::{VaultPaths, VaultStore};
