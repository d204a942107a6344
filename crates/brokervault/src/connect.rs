// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TCP reachability connector.
//!
//! Opens a plain TCP connection to the broker endpoint and reports the
//! session parameters a broker client would use. Speaking MQTT is left to a
//! dedicated client behind the same [`BrokerConnector`] trait.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use brokervault_core::{BrokerConnector, ConnectTarget, VaultError};
use brokervault_vault::mask_secret;
use colored::Colorize;
use tracing::{debug, info};

pub struct TcpConnector {
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn reach(&self, target: &ConnectTarget<'_>) -> Result<TcpStream, VaultError> {
        let authority = target.authority();
        let addrs = authority.to_socket_addrs().map_err(|e| VaultError::Connect {
            message: format!("cannot resolve {authority}"),
            source: Some(Box::new(e)),
        })?;

        let mut last_error = None;
        for addr in addrs {
            debug!(%addr, "trying broker address");
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        Err(VaultError::Connect {
            message: format!("broker {} is unreachable", target.endpoint()),
            source: last_error.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        })
    }
}

impl BrokerConnector for TcpConnector {
    fn name(&self) -> &str {
        "tcp"
    }

    fn connect(&self, target: &ConnectTarget<'_>, topic: &str) -> Result<(), VaultError> {
        println!("Connecting to {}", target.endpoint().bold());
        let stream = self.reach(target)?;
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| target.authority());

        info!(endpoint = %target.endpoint(), "broker reachable");
        println!("{} {peer}", "Reachable:".green());
        println!("  client id : {}", target.client_identifier);
        println!("  username  : {}", target.username);
        println!("  password  : {}", mask_secret(target.password));
        println!("  topic     : {topic}");
        Ok(())
    }
}
