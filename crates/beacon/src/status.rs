// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `beacon status` command implementation.
//!
//! Reports whether transport credentials are configured and usable, with the
//! secret masked, plus the active contacts. Never contacts the provider.

use beacon_config::model::BeaconConfig;
use beacon_core::BeaconError;
use beacon_vault::{mask_secret, CredentialStore};
use colored::Colorize;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::app;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub configured: bool,
    /// Set when credentials are stored but cannot be decrypted.
    pub error: Option<String>,
    pub account_id: Option<String>,
    pub secret: Option<String>,
    pub sender_address: Option<String>,
    pub last_updated: Option<String>,
    pub contacts: Vec<ContactSummary>,
    pub config_path: String,
    pub key_path: String,
}

#[derive(Debug, Serialize)]
pub struct ContactSummary {
    pub name: String,
    pub phone: String,
    pub priority: u32,
}

/// Collect the status of `store` without failing on unusable credentials.
pub fn collect(store: &CredentialStore) -> Result<StatusResponse, BeaconError> {
    let mut response = StatusResponse {
        configured: false,
        error: None,
        account_id: None,
        secret: None,
        sender_address: None,
        last_updated: None,
        contacts: Vec::new(),
        config_path: store.config_path().display().to_string(),
        key_path: store.key_path().display().to_string(),
    };

    match store.get_credentials() {
        Ok(Some(credentials)) => {
            response.configured = credentials.configured;
            response.secret = Some(mask_secret(credentials.auth.secret.expose_secret()));
            response.last_updated = credentials
                .last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());
            response.account_id = Some(credentials.auth.account_id);
            response.sender_address = Some(credentials.sender_address);
        }
        Ok(None) => {}
        Err(e) => response.error = Some(e.to_string()),
    }

    response.contacts = store
        .list_contacts()?
        .into_iter()
        .map(|c| ContactSummary {
            name: c.name,
            phone: c.phone.to_string(),
            priority: c.priority,
        })
        .collect();

    Ok(response)
}

pub fn run_status(config: &BeaconConfig, json: bool, color: bool) -> Result<i32, BeaconError> {
    let store = app::open_store(config);
    let status = collect(&store)?;

    if json {
        let out = serde_json::to_string_pretty(&status).map_err(BeaconError::storage)?;
        println!("{out}");
    } else {
        print_status(&status, color);
    }
    Ok(if status.error.is_some() { 1 } else { 0 })
}

fn print_status(status: &StatusResponse, color: bool) {
    println!();
    println!("  beacon status");
    println!("  {}", "-".repeat(35));

    match (&status.error, status.configured) {
        (Some(error), _) => {
            println!("    Transport: {} {error}", app::fail_tag(color));
        }
        (None, true) => {
            println!("    Transport: {} configured", app::ok_tag(color));
            let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
            println!("    Account:   {}", field(&status.account_id));
            println!("    Secret:    {}", field(&status.secret));
            println!("    Sender:    {}", field(&status.sender_address));
            println!("    Updated:   {}", field(&status.last_updated));
        }
        (None, false) => {
            if color {
                println!("    Transport: {}", "not configured".yellow());
            } else {
                println!("    Transport: not configured");
            }
            println!("    Run:       beacon setup");
        }
    }

    println!("    Contacts:  {}", status.contacts.len());
    for contact in &status.contacts {
        println!(
            "      {:>3}  {}  {}",
            contact.priority, contact.name, contact.phone
        );
    }
    println!("    Store:     {}", status.config_path);
    println!("    Key:       {}", status.key_path);
    println!();
}
