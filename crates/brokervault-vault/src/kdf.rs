// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from the master password.
//!
//! One Argon2id run yields 64 bytes: the first half is the AES-256-GCM key,
//! the second half feeds the verification record. The salt and cost
//! parameters are fixed per installation in a small JSON header file.

use brokervault_config::model::VaultConfig;
use brokervault_core::VaultError;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Length of the per-installation salt.
pub const SALT_LEN: usize = 16;

/// Length of each derived key half.
pub const KEY_LEN: usize = 32;

const HEADER_ALGORITHM: &str = "argon2id";

/// Upper bound on `memory_cost` accepted from a header file (4 GiB in KiB).
pub const MAX_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Upper bound on `iterations` and `parallelism` accepted from a header file.
pub const MAX_PASSES: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    /// Reject costs that Argon2id refuses or that would exhaust the host.
    pub fn check_bounds(&self) -> Result<(), String> {
        if !(1..=MAX_PASSES).contains(&self.parallelism) {
            return Err(format!(
                "parallelism {} outside 1..={MAX_PASSES}",
                self.parallelism
            ));
        }
        if !(1..=MAX_PASSES).contains(&self.iterations) {
            return Err(format!(
                "iterations {} outside 1..={MAX_PASSES}",
                self.iterations
            ));
        }
        let min_memory = 8 * self.parallelism;
        if !(min_memory..=MAX_MEMORY_COST).contains(&self.memory_cost) {
            return Err(format!(
                "memory_cost {} KiB outside {min_memory}..={MAX_MEMORY_COST}",
                self.memory_cost
            ));
        }
        Ok(())
    }
}

impl From<&VaultConfig> for KdfParams {
    fn from(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

/// Key material derived from a password. Zeroed on drop.
pub struct DerivedKeys {
    cipher_key: Zeroizing<[u8; KEY_LEN]>,
    verifier: Zeroizing<[u8; KEY_LEN]>,
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys").finish_non_exhaustive()
    }
}

impl DerivedKeys {
    /// Key for the vault cipher.
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// Input to the verification record digest.
    pub fn verifier(&self) -> &[u8; KEY_LEN] {
        &self.verifier
    }
}

/// Derive the cipher key and verifier from `password` using Argon2id.
pub fn derive_keys(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<DerivedKeys, VaultError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(2 * KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivation(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut output = Zeroizing::new([0u8; 2 * KEY_LEN]);
    argon2
        .hash_password_into(password, salt, output.as_mut())
        .map_err(|e| VaultError::KeyDerivation(format!("Argon2id key derivation failed: {e}")))?;

    let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
    let mut verifier = Zeroizing::new([0u8; KEY_LEN]);
    cipher_key.copy_from_slice(&output[..KEY_LEN]);
    verifier.copy_from_slice(&output[KEY_LEN..]);

    Ok(DerivedKeys {
        cipher_key,
        verifier,
    })
}

/// Generate a random 16-byte salt for Argon2id.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Per-installation KDF settings, persisted next to the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfHeader {
    pub salt: [u8; SALT_LEN],
    pub params: KdfParams,
}

/// JSON shape of the header file.
#[derive(Serialize, Deserialize)]
struct HeaderFile {
    algorithm: String,
    salt: String,
    #[serde(flatten)]
    params: KdfParams,
}

impl KdfHeader {
    /// A header with a fresh random salt.
    pub fn generate(params: KdfParams) -> Result<Self, VaultError> {
        params.check_bounds().map_err(VaultError::KeyDerivation)?;
        Ok(Self {
            salt: generate_salt()?,
            params,
        })
    }

    /// Derive keys for `password` under this header's salt and parameters.
    pub fn derive(&self, password: &[u8]) -> Result<DerivedKeys, VaultError> {
        derive_keys(password, &self.salt, &self.params)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, VaultError> {
        let file = HeaderFile {
            algorithm: HEADER_ALGORITHM.to_string(),
            salt: hex::encode(self.salt),
            params: self.params,
        };
        serde_json::to_vec_pretty(&file)
            .map_err(|e| VaultError::Internal(format!("failed to encode KDF header: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let file: HeaderFile = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::CorruptRecord(format!("unreadable KDF header: {e}")))?;

        if file.algorithm != HEADER_ALGORITHM {
            return Err(VaultError::CorruptRecord(format!(
                "unsupported KDF algorithm `{}`",
                file.algorithm
            )));
        }

        let salt: [u8; SALT_LEN] = hex::decode(&file.salt)
            .map_err(|e| VaultError::CorruptRecord(format!("KDF salt is not hex: {e}")))?
            .try_into()
            .map_err(|_| {
                VaultError::CorruptRecord("corrupted salt (expected 16 bytes)".to_string())
            })?;

        file.params
            .check_bounds()
            .map_err(|e| VaultError::CorruptRecord(format!("KDF header parameters: {e}")))?;

        Ok(Self {
            salt,
            params: file.params,
        })
    }
}

/// Low-cost parameters for fast unit tests.
#[cfg(test)]
pub(crate) const TEST_PARAMS: KdfParams = KdfParams {
    memory_cost: 1024,
    iterations: 1,
    parallelism: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_keys_is_deterministic() {
        let salt = [1u8; SALT_LEN];
        let a = derive_keys(b"test password", &salt, &TEST_PARAMS).unwrap();
        let b = derive_keys(b"test password", &salt, &TEST_PARAMS).unwrap();

        assert_eq!(a.cipher_key(), b.cipher_key());
        assert_eq!(a.verifier(), b.verifier());
    }

    #[test]
    fn different_passwords_produce_different_keys() {
        let salt = [2u8; SALT_LEN];
        let a = derive_keys(b"password one", &salt, &TEST_PARAMS).unwrap();
        let b = derive_keys(b"password two", &salt, &TEST_PARAMS).unwrap();

        assert_ne!(a.cipher_key(), b.cipher_key());
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let a = derive_keys(b"same", &[1u8; SALT_LEN], &TEST_PARAMS).unwrap();
        let b = derive_keys(b"same", &[2u8; SALT_LEN], &TEST_PARAMS).unwrap();

        assert_ne!(a.cipher_key(), b.cipher_key());
    }

    #[test]
    fn cipher_key_and_verifier_are_independent() {
        let keys = derive_keys(b"pw", &[3u8; SALT_LEN], &TEST_PARAMS).unwrap();
        assert_ne!(keys.cipher_key(), keys.verifier());
    }

    #[test]
    fn long_and_empty_passwords_are_accepted() {
        let long = "x".repeat(4096);
        assert!(derive_keys(long.as_bytes(), &[0u8; SALT_LEN], &TEST_PARAMS).is_ok());
        assert!(derive_keys(b"", &[0u8; SALT_LEN], &TEST_PARAMS).is_ok());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = KdfParams {
            memory_cost: 1024,
            iterations: 0,
            parallelism: 1,
        };
        let result = derive_keys(b"pw", &[0u8; SALT_LEN], &params);
        assert!(matches!(result, Err(VaultError::KeyDerivation(_))));
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[test]
    fn header_survives_encoding() {
        let header = KdfHeader::generate(TEST_PARAMS).unwrap();
        let bytes = header.to_bytes().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains("\"algorithm\": \"argon2id\""));
        assert!(text.contains("\"memory_cost\": 1024"));
        assert_eq!(KdfHeader::from_bytes(&bytes).unwrap(), header);
    }

    fn header_json(algorithm: &str, salt: &str, params: (u32, u32, u32)) -> Vec<u8> {
        serde_json::json!({
            "algorithm": algorithm,
            "salt": salt,
            "memory_cost": params.0,
            "iterations": params.1,
            "parallelism": params.2,
        })
        .to_string()
        .into_bytes()
    }

    fn header_with(memory_cost: u32, iterations: u32, parallelism: u32) -> Vec<u8> {
        let salt = "00".repeat(SALT_LEN);
        header_json(HEADER_ALGORITHM, &salt, (memory_cost, iterations, parallelism))
    }

    #[test]
    fn header_with_short_salt_is_corrupt() {
        let bytes = header_json("argon2id", "abcd", (1024, 1, 1));
        assert!(matches!(
            KdfHeader::from_bytes(&bytes),
            Err(VaultError::CorruptRecord(_))
        ));
    }

    #[test]
    fn header_with_huge_memory_cost_is_corrupt() {
        let bytes = header_with(4_000_000_000, 1, 1);
        assert!(matches!(
            KdfHeader::from_bytes(&bytes),
            Err(VaultError::CorruptRecord(_))
        ));
    }

    #[test]
    fn header_with_out_of_range_passes_is_corrupt() {
        for (memory_cost, iterations, parallelism) in
            [(1024, 0, 1), (1024, 1000, 1), (1024, 1, 0), (1024, 1, 65), (8, 1, 2)]
        {
            let bytes = header_with(memory_cost, iterations, parallelism);
            assert!(
                matches!(KdfHeader::from_bytes(&bytes), Err(VaultError::CorruptRecord(_))),
                "{memory_cost}/{iterations}/{parallelism} accepted"
            );
        }
    }

    #[test]
    fn header_at_upper_bounds_is_accepted() {
        let bytes = header_with(MAX_MEMORY_COST, MAX_PASSES, MAX_PASSES);
        let header = KdfHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.params.memory_cost, MAX_MEMORY_COST);
    }

    #[test]
    fn generate_refuses_out_of_range_params() {
        let params = KdfParams {
            memory_cost: 1024,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            KdfHeader::generate(params),
            Err(VaultError::KeyDerivation(_))
        ));
    }

    #[test]
    fn header_with_unknown_algorithm_is_corrupt() {
        let bytes = header_json("scrypt", &"00".repeat(SALT_LEN), (1024, 1, 1));
        assert!(matches!(
            KdfHeader::from_bytes(&bytes),
            Err(VaultError::CorruptRecord(_))
        ));
    }
}
