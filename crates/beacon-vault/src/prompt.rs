// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret input: the optional key passphrase and interactive secret prompts.

use beacon_core::BeaconError;
use secrecy::SecretString;

/// Environment variable holding the passphrase that protects the key artifact.
pub const KEY_PASSPHRASE_ENV_VAR: &str = "BEACON_KEY_PASSPHRASE";

/// Passphrase for the key artifact, if the operator set one.
///
/// Unset or empty means the key artifact is stored raw.
pub fn key_passphrase() -> Option<SecretString> {
    std::env::var(KEY_PASSPHRASE_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Read a secret from the terminal without echo.
///
/// Fails when stdin is not a terminal or the input is empty.
pub fn read_secret(prompt: &str) -> Result<SecretString, BeaconError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(BeaconError::Validation(format!(
            "{prompt} must be entered interactively"
        )));
    }
    eprint!("{prompt}: ");
    let value = rpassword::read_password()
        .map_err(|e| BeaconError::Internal(format!("failed to read {prompt}: {e}")))?;
    if value.trim().is_empty() {
        return Err(BeaconError::Validation(format!("{prompt} must not be empty")));
    }
    Ok(SecretString::from(value.trim().to_string()))
}
