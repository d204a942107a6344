// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the BrokerVault credential vault.
//!
//! This crate provides the error taxonomy, the profile data model and the
//! collaborator traits shared by the vault, config and CLI crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use traits::{BrokerConnector, ConnectTarget};
pub use types::{NewProfile, Profile, VaultCollection, generate_profile_id};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_error_messages_are_distinct() {
        let messages = [
            VaultError::InvalidPassword.to_string(),
            VaultError::AuthenticationFailure.to_string(),
            VaultError::CorruptVault("bad json".into()).to_string(),
            VaultError::io("/tmp/vault", std::io::Error::other("disk full")).to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[3].contains("/tmp/vault"));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;

        let err = VaultError::io("/tmp/x", std::io::Error::other("boom"));
        assert!(err.source().is_some());
    }
}
