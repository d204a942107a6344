// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BrokerVault - an encrypted local vault for MQTT broker credentials.
//!
//! This is the binary entry point.

mod commands;
mod connect;
mod session;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// BrokerVault - an encrypted local vault for MQTT broker credentials.
#[derive(Parser, Debug)]
#[command(name = "brokervault", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Launch the interactive shell (default).
    Shell,
    /// Create the master password for a new vault.
    Init,
    /// List stored brokers.
    List,
    /// Change the master password and re-encrypt the vault.
    Passwd,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => brokervault_config::load_and_validate_path(path),
        None => brokervault_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            brokervault_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.shell.log_level);
    tracing::debug!(vault = %config.storage.vault_file.display(), "config loaded");

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run_shell(&config),
        Commands::Init => commands::run_init(&config),
        Commands::List => commands::run_list(&config),
        Commands::Passwd => commands::run_passwd(&config),
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brokervault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
