// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits implemented outside the vault core.

pub mod connector;

pub use connector::{BrokerConnector, ConnectTarget};
