// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::BeaconConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &BeaconConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    // Encryption at rest is meaningless if the key sits in the ciphertext file.
    if config.store.config_path == config.store.key_path {
        errors.push(ConfigError::validation(format!(
            "store.key_path must differ from store.config_path (both are `{}`)",
            config.store.config_path.display()
        )));
    }
    if config.store.config_path.as_os_str().is_empty() {
        errors.push(ConfigError::validation("store.config_path must not be empty"));
    }
    if config.store.key_path.as_os_str().is_empty() {
        errors.push(ConfigError::validation("store.key_path must not be empty"));
    }

    let code = &config.phone.default_calling_code;
    if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::validation(format!(
            "phone.default_calling_code `{code}` must be 1-3 digits without `+`"
        )));
    }

    if config.dispatch.text_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "dispatch.text_timeout_secs must be greater than 0",
        ));
    }
    if config.dispatch.voice_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "dispatch.voice_timeout_secs must be greater than 0",
        ));
    }

    let base = config.transport.api_base_url.trim();
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        errors.push(ConfigError::validation(format!(
            "transport.api_base_url `{base}` must be an http(s) URL"
        )));
    }

    if config.ledger.capacity == 0 {
        errors.push(ConfigError::validation(
            "ledger.capacity must be greater than 0",
        ));
    }
    if let Some(journal) = config.ledger.journal_file() {
        if journal.as_os_str().is_empty() {
            errors.push(ConfigError::validation("ledger.journal_path must not be empty"));
        } else if journal == config.store.config_path || journal == config.store.key_path {
            errors.push(ConfigError::validation(format!(
                "ledger.journal_path must differ from the store files (got `{}`)",
                journal.display()
            )));
        }
    }

    if config.vault.kdf_memory_cost < 32768 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
            config.vault.kdf_memory_cost
        )));
    }
    if config.vault.kdf_iterations < 2 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_iterations must be at least 2, got {}",
            config.vault.kdf_iterations
        )));
    }
    if config.vault.kdf_parallelism < 1 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_parallelism must be at least 1, got {}",
            config.vault.kdf_parallelism
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
