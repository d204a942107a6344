// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `brokervault shell` command implementation.
//!
//! Unlocks the vault, then runs a readline REPL over the stored broker
//! profiles. The loop owns the store, the current collection and the master
//! password; every mutation replaces the collection with the one returned by
//! the repository after a successful save.

use std::time::Duration;

use brokervault_config::model::BrokerVaultConfig;
use brokervault_core::{
    BrokerConnector, ConnectTarget, NewProfile, Profile, VaultCollection, VaultError,
};
use brokervault_vault::{mask_secret, prompt_new_password, CredentialRepository, VaultStore};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use crate::connect::TcpConnector;
use crate::session;

/// A parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Create,
    Remove(usize),
    List,
    Show(usize),
    Connect { index: usize, topic: Option<String> },
    SetPassword,
    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a profile number, see `ls`")]
    BadIndex(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("create", []) => ShellCommand::Create,
        ("create", _) => return Err(ParseError::Usage("create")),
        ("remove", [n]) => ShellCommand::Remove(parse_index(n)?),
        ("remove", _) => return Err(ParseError::Usage("remove <n>")),
        ("ls", []) => ShellCommand::List,
        ("ls", _) => return Err(ParseError::Usage("ls")),
        ("show", [n]) => ShellCommand::Show(parse_index(n)?),
        ("show", _) => return Err(ParseError::Usage("show <n>")),
        ("connect", [n]) => ShellCommand::Connect {
            index: parse_index(n)?,
            topic: None,
        },
        ("connect", [n, topic]) => ShellCommand::Connect {
            index: parse_index(n)?,
            topic: Some((*topic).to_string()),
        },
        ("connect", _) => return Err(ParseError::Usage("connect <n> [topic]")),
        ("setpassword", []) => ShellCommand::SetPassword,
        ("setpassword", _) => return Err(ParseError::Usage("setpassword")),
        ("help", _) => ShellCommand::Help,
        ("exit" | "quit", _) => ShellCommand::Exit,
        (other, _) => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_index(word: &str) -> Result<usize, ParseError> {
    word.parse()
        .map_err(|_| ParseError::BadIndex(word.to_string()))
}

/// Runs the `brokervault shell` interactive REPL.
pub fn run_shell(config: &BrokerVaultConfig) -> Result<(), VaultError> {
    let store = session::open_store(config)?;
    session::ensure_initialized(&store)?;
    let (collection, password) = session::unlock(&store)?;

    let connector = TcpConnector::new(Duration::from_secs(config.shell.connect_timeout_secs));
    let editor = DefaultEditor::new()
        .map_err(|e| VaultError::Internal(format!("failed to initialize readline: {e}")))?;

    let mut shell = Shell {
        store: &store,
        collection,
        password,
        connector: &connector,
        editor,
    };
    shell.run();
    Ok(())
}

struct Shell<'a> {
    store: &'a VaultStore,
    collection: VaultCollection,
    password: SecretString,
    connector: &'a dyn BrokerConnector,
    editor: DefaultEditor,
}

impl Shell<'_> {
    fn run(&mut self) {
        println!("{}", "MQTT broker vault".bold().green());
        print_help();

        let prompt = format!("{}> ", "brokervault".green());
        loop {
            let line = match self.editor.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    break;
                }
            };

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    continue;
                }
            };
            let _ = self.editor.add_history_entry(line.as_str());

            if command == ShellCommand::Exit {
                break;
            }
            if let Err(e) = self.execute(command) {
                eprintln!("{}: {e}", "error".red());
            }
        }

        println!("{}", "goodbye".dimmed());
    }

    fn execute(&mut self, command: ShellCommand) -> Result<(), VaultError> {
        let repo = CredentialRepository::new(self.store);
        match command {
            ShellCommand::Create => {
                let profile = self.read_new_profile()?;
                let name = profile.display_name.clone();
                self.collection = repo.add(&self.collection, profile, &self.password)?;
                println!("Broker {} created", name.bold());
            }
            ShellCommand::Remove(index) => {
                let profile = repo.select(&self.collection, index)?.clone();
                self.collection = repo.remove(&self.collection, &profile, &self.password)?;
                println!("Broker {} removed", profile.display_name.bold());
            }
            ShellCommand::List => print_profiles(repo.list(&self.collection)),
            ShellCommand::Show(index) => {
                print_profile(index, repo.select(&self.collection, index)?);
            }
            ShellCommand::Connect { index, topic } => {
                let topic = match topic {
                    Some(topic) => topic,
                    None => self.read_field("topic: ")?,
                };
                let profile = repo.select(&self.collection, index)?;
                info!(connector = self.connector.name(), "connecting to broker");
                self.connector.connect(&ConnectTarget::from(profile), &topic)?;
            }
            ShellCommand::SetPassword => {
                let new_password = prompt_new_password()?;
                self.collection = self.store.change_password(&self.password, &new_password)?;
                self.password = new_password;
                println!("{}", "Master password changed.".green());
            }
            ShellCommand::Help => print_help(),
            ShellCommand::Exit => {}
        }
        Ok(())
    }

    fn read_new_profile(&mut self) -> Result<NewProfile, VaultError> {
        let mut profile = NewProfile::default();
        profile.display_name = self.read_field("name: ")?;
        profile.client_identifier = self.read_field("client id: ")?;
        profile.host = self.read_field("host: ")?;
        let port = self.read_field("port: ")?;
        profile.port = port
            .parse()
            .map_err(|_| VaultError::InvalidProfile(format!("`{port}` is not a valid port")))?;
        profile.username = self.read_field("username: ")?;
        profile.password = rpassword::prompt_password("password: ")
            .map_err(|e| VaultError::Internal(format!("failed to read password: {e}")))?;
        Ok(profile)
    }

    fn read_field(&mut self, label: &str) -> Result<String, VaultError> {
        match self.editor.readline(label) {
            Ok(value) => Ok(value.trim().to_string()),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                Err(VaultError::Internal("input cancelled".to_string()))
            }
            Err(e) => Err(VaultError::Internal(format!("failed to read input: {e}"))),
        }
    }
}

fn print_help() {
    println!("Commands:");
    for (usage, about) in [
        ("create", "Add broker credentials"),
        ("remove <n>", "Remove broker credentials"),
        ("ls", "List stored brokers"),
        ("show <n>", "Show one broker, password masked"),
        ("connect <n> [topic]", "Connect to a stored broker"),
        ("setpassword", "Change the master password"),
        ("help", "Show this list"),
        ("exit", "Leave the shell"),
    ] {
        println!("  {:<22}{}", usage.yellow(), about);
    }
}

/// Numbered listing used by `ls` and `brokervault list`.
pub(crate) fn print_profiles(profiles: &[Profile]) {
    if profiles.is_empty() {
        println!("{}", "No brokers stored.".dimmed());
        return;
    }
    for (index, profile) in profiles.iter().enumerate() {
        println!(
            "{index:>3}: {}  {}",
            profile.display_name.bold(),
            ConnectTarget::from(profile).endpoint().dimmed()
        );
    }
}

fn print_profile(index: usize, profile: &Profile) {
    println!("{index:>3}: {}", profile.display_name.bold());
    println!("     id        : {}", profile.id);
    println!("     client id : {}", profile.client_identifier);
    println!("     endpoint  : {}", ConnectTarget::from(profile).endpoint());
    println!("     username  : {}", profile.username);
    println!("     password  : {}", mask_secret(&profile.password));
}
