// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level Beacon configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BeaconConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where credentials, contacts, and the key artifact live.
    #[serde(default)]
    pub store: StoreConfig,

    /// Argon2id parameters for passphrase-wrapped key artifacts.
    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub phone: PhoneConfig,

    /// Per-channel deadlines.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Messaging provider endpoint settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Alert ledger retention.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Persisted configuration resource locations.
///
/// The key artifact must never be the same file as the configuration record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON record holding the encrypted credential block and contact list.
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Symmetric key artifact protecting the credential secret.
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            key_path: default_key_path(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("beacon"))
        .unwrap_or_else(|| PathBuf::from(".beacon"))
}

fn default_config_path() -> PathBuf {
    data_dir().join("emergency_config.json")
}

fn default_key_path() -> PathBuf {
    data_dir().join("encryption.key")
}

/// Argon2id key derivation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Phone number policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneConfig {
    /// Calling code assumed for bare 10-digit national numbers.
    ///
    /// Accepts `"1"` or `1`; env overrides arrive as integers.
    #[serde(default = "default_calling_code", deserialize_with = "string_or_integer")]
    pub default_calling_code: String,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            default_calling_code: default_calling_code(),
        }
    }
}

fn default_calling_code() -> String {
    "1".to_string()
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Channel deadlines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    #[serde(default = "default_text_timeout_secs")]
    pub text_timeout_secs: u64,

    #[serde(default = "default_voice_timeout_secs")]
    pub voice_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            text_timeout_secs: default_text_timeout_secs(),
            voice_timeout_secs: default_voice_timeout_secs(),
        }
    }
}

fn default_text_timeout_secs() -> u64 {
    15
}

fn default_voice_timeout_secs() -> u64 {
    20
}

/// Messaging provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Base URL of the provider REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Voice used to speak call scripts.
    #[serde(default = "default_voice")]
    pub voice: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            voice: default_voice(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_voice() -> String {
    "alice".to_string()
}

/// Alert ledger retention.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Maximum records kept in memory; oldest are evicted first.
    #[serde(default = "default_ledger_capacity")]
    pub capacity: usize,

    /// Append every record to `journal_path` and reload its tail on start.
    /// Turning this off keeps records only for the life of the process.
    #[serde(default = "default_journal")]
    pub journal: bool,

    /// JSON-lines audit file, next to the credential store by default.
    #[serde(default = "default_journal_path")]
    pub journal_path: PathBuf,
}

impl LedgerConfig {
    /// The journal file, or `None` when journaling is switched off.
    pub fn journal_file(&self) -> Option<&Path> {
        self.journal.then_some(self.journal_path.as_path())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: default_ledger_capacity(),
            journal: default_journal(),
            journal_path: default_journal_path(),
        }
    }
}

fn default_ledger_capacity() -> usize {
    500
}

fn default_journal() -> bool {
    true
}

fn default_journal_path() -> PathBuf {
    data_dir().join("alerts.jsonl")
}
