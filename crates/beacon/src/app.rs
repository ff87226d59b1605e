// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by the subcommands.

use std::io::IsTerminal;
use std::sync::Arc;

use beacon_alert::{AlertLedger, AlertOrchestrator};
use beacon_config::model::BeaconConfig;
use beacon_core::BeaconError;
use beacon_dispatch::TransportDispatcher;
use beacon_vault::CredentialStore;
use colored::Colorize;

/// Colors are used only on an interactive stdout and without `--plain`.
pub fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// Open the credential store described by `config`.
pub fn open_store(config: &BeaconConfig) -> CredentialStore {
    CredentialStore::from_config(config, beacon_vault::key_passphrase())
}

/// Build an orchestrator backed by the real transport and the configured ledger.
pub fn orchestrator(config: &BeaconConfig) -> Result<AlertOrchestrator, BeaconError> {
    let store = Arc::new(open_store(config));
    let dispatcher = Arc::new(TransportDispatcher::from_config(config)?);
    let ledger = AlertLedger::from_config(&config.ledger)?;
    Ok(AlertOrchestrator::new(store, dispatcher, ledger))
}

pub fn ok_tag(color: bool) -> String {
    if color {
        "OK".green().bold().to_string()
    } else {
        "[OK]".to_string()
    }
}

pub fn fail_tag(color: bool) -> String {
    if color {
        "FAIL".red().bold().to_string()
    } else {
        "[FAIL]".to_string()
    }
}

pub fn print_error(error: &BeaconError, color: bool) {
    if color {
        eprintln!("{} {error}", "error:".red().bold());
    } else {
        eprintln!("error: {error}");
    }
}

/// Configuration whose store and journal live in `dir`, with Indian numbering.
#[cfg(test)]
pub fn config_in(dir: &std::path::Path) -> BeaconConfig {
    let toml = format!(
        "[store]\nconfig_path = {:?}\nkey_path = {:?}\n[phone]\ndefault_calling_code = \"91\"\n\
         [ledger]\njournal_path = {:?}\n",
        dir.join("emergency_config.json"),
        dir.join("encryption.key"),
        dir.join("alerts.jsonl"),
    );
    beacon_config::load_and_validate_str(&toml).expect("test config is valid")
}
