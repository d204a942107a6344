// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile CRUD on top of [`VaultStore`].
//!
//! Every mutation works on a copy of the collection, saves the whole copy and
//! only then returns it, so the caller's state changes only after a durable
//! write.

use brokervault_core::{NewProfile, Profile, VaultCollection, VaultError};
use secrecy::SecretString;
use tracing::debug;

use crate::store::VaultStore;

pub struct CredentialRepository<'a> {
    store: &'a VaultStore,
}

impl<'a> CredentialRepository<'a> {
    pub fn new(store: &'a VaultStore) -> Self {
        Self { store }
    }

    /// Validate `profile`, give it a fresh id, append it and persist.
    pub fn add(
        &self,
        collection: &VaultCollection,
        profile: NewProfile,
        password: &SecretString,
    ) -> Result<VaultCollection, VaultError> {
        profile.validate()?;

        let mut next = collection.clone();
        let id = next.push_with_fresh_id(profile).id.clone();
        self.store.save(&next, password)?;

        debug!(id = %id, "profile added");
        Ok(next)
    }

    /// Remove the entry with `profile`'s id and persist.
    ///
    /// A profile that is not in the collection leaves it unchanged.
    pub fn remove(
        &self,
        collection: &VaultCollection,
        profile: &Profile,
        password: &SecretString,
    ) -> Result<VaultCollection, VaultError> {
        let mut next = collection.clone();
        let removed = next.remove_by_id(&profile.id).is_some();
        self.store.save(&next, password)?;

        if removed {
            debug!(id = %profile.id, "profile removed");
        } else {
            debug!(id = %profile.id, "profile not in vault, nothing removed");
        }
        Ok(next)
    }

    /// Profiles in insertion order.
    pub fn list<'c>(&self, collection: &'c VaultCollection) -> &'c [Profile] {
        collection.profiles()
    }

    /// The profile at a 0-based position in [`CredentialRepository::list`].
    pub fn select<'c>(
        &self,
        collection: &'c VaultCollection,
        index: usize,
    ) -> Result<&'c Profile, VaultError> {
        collection.get(index).ok_or_else(|| {
            VaultError::ProfileNotFound(format!(
                "no profile at position {index} ({} stored)",
                collection.len()
            ))
        })
    }
}
