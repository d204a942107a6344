// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encryption of vault payloads.
//!
//! Every call to [`encrypt`] generates a fresh random 96-bit nonce via the
//! system CSPRNG and prepends it to the output: `nonce ‖ ciphertext ‖ tag`.
//! Zero-length input passes through untouched in both directions, since an
//! empty vault file is a valid state before the first write.

use brokervault_core::VaultError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::KEY_LEN;

pub use ring::aead::NONCE_LEN;

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| VaultError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning `nonce ‖ ciphertext ‖ tag`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
    if plaintext.is_empty() {
        return Ok(Vec::new());
    }

    let key = aead_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| VaultError::Crypto("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| VaultError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&in_out);

    Ok(out)
}

/// Decrypt a payload produced by [`encrypt`].
///
/// Fails with [`VaultError::AuthenticationFailure`] when the tag does not
/// verify or the payload is too short to hold a nonce and tag.
pub fn decrypt(key: &[u8; KEY_LEN], data: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    if data.is_empty() {
        return Ok(Zeroizing::new(Vec::new()));
    }
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::AuthenticationFailure);
    }

    let key = aead_key(key)?;

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| VaultError::AuthenticationFailure)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(nonce, Aad::empty(), in_out.as_mut_slice())
        .map_err(|_| VaultError::AuthenticationFailure)?
        .len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}
