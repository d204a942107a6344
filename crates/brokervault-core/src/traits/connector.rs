// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connector trait for handing decrypted credentials to a broker client.

use crate::error::VaultError;
use crate::types::Profile;

/// Borrowed view of the credentials a broker client needs.
///
/// Built from a [`Profile`] after the vault is unlocked; the password is only
/// borrowed and never copied.
#[derive(Clone, Copy)]
pub struct ConnectTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub client_identifier: &'a str,
}

impl<'a> From<&'a Profile> for ConnectTarget<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            host: &profile.host,
            port: profile.port,
            username: &profile.username,
            password: &profile.password,
            client_identifier: &profile.client_identifier,
        }
    }
}

impl ConnectTarget<'_> {
    /// `host:port`, with IPv6 literals bracketed.
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Broker URI in the `tcp://host:port` form clients expect.
    pub fn endpoint(&self) -> String {
        format!("tcp://{}", self.authority())
    }
}

impl std::fmt::Debug for ConnectTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_identifier", &self.client_identifier)
            .finish()
    }
}

/// A broker client capable of opening a session with stored credentials.
///
/// The vault treats connecting as fire-and-forget: implementations own the
/// connection lifecycle, retries and timeouts.
pub trait BrokerConnector {
    /// Human-readable name of this connector.
    fn name(&self) -> &str;

    /// Connect to the broker described by `target` and subscribe to `topic`.
    fn connect(&self, target: &ConnectTarget<'_>, topic: &str) -> Result<(), VaultError>;
}
