// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `beacon setup`: interactive credential configuration.
//!
//! Asks for the provider account id, secret token (hidden) and sender
//! number, stores them encrypted, then optionally adds a primary contact and
//! sends a test probe to it.

use std::io::{BufRead, Write};

use beacon_config::model::BeaconConfig;
use beacon_core::BeaconError;
use secrecy::SecretString;
use tracing::debug;

use crate::app;

/// Read the secret token from this variable instead of prompting.
pub const AUTH_TOKEN_ENV_VAR: &str = "BEACON_AUTH_TOKEN";

pub async fn run_setup(
    config: &BeaconConfig,
    account_id: Option<String>,
    sender: Option<String>,
    color: bool,
) -> Result<i32, BeaconError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let account_id = match account_id {
        Some(id) => id,
        None => prompt_line(&mut input, "Account id")?,
    };
    let secret = match auth_token_from_env() {
        Some(secret) => {
            debug!("secret token taken from {AUTH_TOKEN_ENV_VAR}");
            secret
        }
        None => beacon_vault::read_secret("Secret token")?,
    };
    let sender = match sender {
        Some(sender) => sender,
        None => prompt_line(&mut input, "Sender number (as assigned by the provider)")?,
    };

    let store = app::open_store(config);
    store.save_credentials(&account_id, &secret, &sender)?;
    println!(
        "{} credentials saved to {}",
        app::ok_tag(color),
        store.config_path().display()
    );

    let name = prompt_line(&mut input, "Primary contact name (blank to skip)")?;
    if name.is_empty() {
        return Ok(0);
    }
    let phone = prompt_line(&mut input, "Primary contact number")?;
    let contact = store.add_contact(&name, &phone, 1)?;
    println!("{} added {} {}", app::ok_tag(color), contact.name, contact.phone);

    let answer = prompt_line(&mut input, "Send a test message now? [y/N]")?;
    if !is_yes(&answer) {
        return Ok(0);
    }
    drop(input);

    let orchestrator = app::orchestrator(config)?;
    match orchestrator.test_channel(&contact.phone).await {
        Ok(confirmation) => {
            println!("{} test message sent ({confirmation})", app::ok_tag(color));
            Ok(0)
        }
        Err(e) => {
            println!("{} test message failed: {e}", app::fail_tag(color));
            Ok(1)
        }
    }
}

fn auth_token_from_env() -> Option<SecretString> {
    std::env::var(AUTH_TOKEN_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Print `prompt` to stderr and read one trimmed line.
fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String, BeaconError> {
    eprint!("{prompt}: ");
    std::io::stderr()
        .flush()
        .map_err(|e| BeaconError::Internal(format!("failed to flush prompt: {e}")))?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| BeaconError::Internal(format!("failed to read {prompt}: {e}")))?;
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
