// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile and collection types persisted inside the encrypted vault.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::VaultError;

/// Number of hex characters in a generated profile id.
pub const PROFILE_ID_LEN: usize = 10;

/// One stored set of broker connection credentials.
///
/// Every field is wiped from memory when the profile is dropped. The `Debug`
/// output never includes the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque id assigned by the vault, unique within a collection.
    pub id: String,
    pub display_name: String,
    pub client_identifier: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("client_identifier", &self.client_identifier)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// User-entered profile fields, before the vault assigns an id.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NewProfile {
    pub display_name: String,
    pub client_identifier: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for NewProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewProfile")
            .field("display_name", &self.display_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl NewProfile {
    /// Check the fields the vault relies on: a name to display, a host and a
    /// non-zero port.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.display_name.trim().is_empty() {
            return Err(VaultError::InvalidProfile(
                "display name must not be empty".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(VaultError::InvalidProfile("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(VaultError::InvalidProfile(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        Ok(())
    }

    fn into_profile(mut self, id: String) -> Profile {
        Profile {
            id,
            display_name: std::mem::take(&mut self.display_name),
            client_identifier: std::mem::take(&mut self.client_identifier),
            host: std::mem::take(&mut self.host),
            port: self.port,
            username: std::mem::take(&mut self.username),
            password: std::mem::take(&mut self.password),
        }
    }
}

/// Ordered sequence of profiles. Insertion order is the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCollection {
    #[serde(default)]
    profiles: Vec<Profile>,
}

impl VaultCollection {
    /// An empty collection, the state of a freshly created vault.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile at a 0-based display position.
    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    /// Assign a fresh unique id to `profile` and append it.
    ///
    /// Returns a reference to the stored profile.
    pub fn push_with_fresh_id(&mut self, profile: NewProfile) -> &Profile {
        let id = generate_profile_id(self);
        self.profiles.push(profile.into_profile(id));
        let last = self.profiles.len() - 1;
        &self.profiles[last]
    }

    /// Remove the profile with the given id, if present.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Profile> {
        self.position_of(id).map(|index| self.profiles.remove(index))
    }
}

/// Generate a random id that no profile in `collection` uses yet.
///
/// Ids are [`PROFILE_ID_LEN`] lowercase hex characters. On collision a new
/// candidate is drawn until one is free.
pub fn generate_profile_id(collection: &VaultCollection) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let mut bytes = [0u8; PROFILE_ID_LEN / 2];
        rng.fill_bytes(&mut bytes);
        let candidate = hex::encode(bytes);
        if !collection.contains_id(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn sample(name: &str) -> NewProfile {
        NewProfile {
            display_name: name.to_string(),
            client_identifier: "client-1".to_string(),
            host: "10.0.0.5".to_string(),
            port: 1883,
            username: "u".to_string(),
            password: "p".to_string(),
        }
    }

    #[test]
    fn push_assigns_id_and_keeps_fields() {
        let mut collection = VaultCollection::new();
        let stored = collection.push_with_fresh_id(sample("home")).clone();

        assert_eq!(stored.id.len(), PROFILE_ID_LEN);
        assert!(stored.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stored.display_name, "home");
        assert_eq!(stored.host, "10.0.0.5");
        assert_eq!(stored.port, 1883);
        assert_eq!(stored.username, "u");
        assert_eq!(stored.password, "p");
    }

    #[test]
    fn ten_thousand_ids_are_pairwise_distinct() {
        let mut collection = VaultCollection::new();
        for i in 0..10_000 {
            collection.push_with_fresh_id(sample(&format!("broker-{i}")));
        }

        let ids: HashSet<&str> = collection.profiles().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut collection = VaultCollection::new();
        for name in ["a", "b", "c"] {
            collection.push_with_fresh_id(sample(name));
        }
        let names: Vec<&str> = collection
            .profiles()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut collection = VaultCollection::new();
        collection.push_with_fresh_id(sample("a"));
        let before = collection.clone();

        assert!(collection.remove_by_id("not-an-id").is_none());
        assert_eq!(collection, before);
    }

    #[test]
    fn validate_rejects_zero_port_and_blank_host() {
        let mut profile = sample("x");
        profile.port = 0;
        assert!(matches!(profile.validate(), Err(VaultError::InvalidProfile(_))));

        let mut profile = sample("x");
        profile.host = "   ".to_string();
        assert!(matches!(profile.validate(), Err(VaultError::InvalidProfile(_))));

        assert!(sample("x").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_password() {
        let mut collection = VaultCollection::new();
        let mut profile = sample("home");
        profile.password = "hunter2-secret".to_string();
        let stored = collection.push_with_fresh_id(profile);

        let debug = format!("{stored:?}");
        assert!(!debug.contains("hunter2-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn serialized_field_names_are_camel_case() {
        let mut collection = VaultCollection::new();
        collection.push_with_fresh_id(sample("home"));
        let json = serde_json::to_string(&collection).unwrap();

        assert!(json.starts_with("{\"profiles\":["));
        assert!(json.contains("\"displayName\":\"home\""));
        assert!(json.contains("\"clientIdentifier\":\"client-1\""));
    }
}
