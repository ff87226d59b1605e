// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store: encrypted transport credentials plus the emergency
//! contact list, persisted as one JSON record.
//!
//! Writes are serialized: a single in-process writer lock covers the whole
//! read-modify-write cycle, and the record is replaced atomically by writing a
//! temp file in the same directory and renaming it over the original. Readers
//! never observe a half-written record.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use beacon_config::model::BeaconConfig;
use beacon_core::phone::normalize_phone;
use beacon_core::{BeaconError, Contact, ProviderAuth, TransportCredentials};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::crypto::SealedBox;
use crate::kdf::KdfParams;
use crate::keyfile::KeyArtifact;

/// The persisted configuration record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transport: Option<StoredTransport>,
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTransport {
    account_id: String,
    secret: SealedBox,
    sender_address: String,
    configured: bool,
    last_updated: DateTime<Utc>,
}

/// Durable, encrypted store consulted before every dispatch.
#[derive(Debug)]
pub struct CredentialStore {
    config_path: PathBuf,
    key: KeyArtifact,
    calling_code: String,
    writer: Mutex<()>,
}

impl CredentialStore {
    pub fn new(config_path: impl Into<PathBuf>, key: KeyArtifact, calling_code: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            key,
            calling_code: calling_code.into(),
            writer: Mutex::new(()),
        }
    }

    /// Build a store from loaded configuration.
    ///
    /// `passphrase` protects the key artifact when one is supplied.
    pub fn from_config(config: &BeaconConfig, passphrase: Option<SecretString>) -> Self {
        let key = KeyArtifact::new(
            &config.store.key_path,
            passphrase,
            KdfParams::from(&config.vault),
        );
        Self::new(
            &config.store.config_path,
            key,
            &config.phone.default_calling_code,
        )
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn key_path(&self) -> &Path {
        self.key.path()
    }

    pub fn calling_code(&self) -> &str {
        &self.calling_code
    }

    /// Encrypt `secret` and replace any previously stored credentials.
    pub fn save_credentials(
        &self,
        account_id: &str,
        secret: &SecretString,
        sender_address: &str,
    ) -> Result<(), BeaconError> {
        let account_id = account_id.trim();
        let sender_address = sender_address.trim();
        if account_id.is_empty() {
            return Err(BeaconError::Validation("account id is required".to_string()));
        }
        if secret.expose_secret().is_empty() {
            return Err(BeaconError::Validation("secret token is required".to_string()));
        }
        if sender_address.is_empty() {
            return Err(BeaconError::Validation("sender address is required".to_string()));
        }

        let key = self.key.load_or_create()?;
        let sealed = SealedBox::seal(&key, secret.expose_secret().as_bytes())?;

        self.update(|stored| {
            stored.transport = Some(StoredTransport {
                account_id: account_id.to_string(),
                secret: sealed,
                sender_address: sender_address.to_string(),
                configured: true,
                last_updated: Utc::now(),
            });
            Ok(())
        })?;

        info!(account_id, "transport credentials saved");
        Ok(())
    }

    /// Decrypt and return the stored credentials.
    ///
    /// `Ok(None)` means never configured. A key/ciphertext mismatch is an
    /// `Encryption` error, never `None`.
    pub fn get_credentials(&self) -> Result<Option<TransportCredentials>, BeaconError> {
        let Some(transport) = self.read()?.transport.filter(|t| t.configured) else {
            return Ok(None);
        };

        let key = self.key.load()?.ok_or_else(|| {
            BeaconError::Encryption(format!(
                "credentials are stored but key artifact {} is missing",
                self.key.path().display()
            ))
        })?;
        let plaintext = transport.secret.open(&key)?;
        let secret = String::from_utf8(plaintext).map_err(|_| {
            BeaconError::Encryption("decrypted secret is not valid UTF-8".to_string())
        })?;

        Ok(Some(TransportCredentials {
            auth: ProviderAuth {
                account_id: transport.account_id,
                secret: SecretString::from(secret),
            },
            sender_address: transport.sender_address,
            configured: true,
            last_updated: Some(transport.last_updated),
        }))
    }

    /// Validate, normalize, and append a contact.
    ///
    /// Invalid phone numbers are rejected with `Validation` and nothing is written.
    pub fn add_contact(&self, name: &str, phone: &str, priority: u32) -> Result<Contact, BeaconError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BeaconError::Validation("contact name is required".to_string()));
        }
        let phone = normalize_phone(phone, &self.calling_code)?;

        let contact = self.update(|stored| {
            let contact = Contact {
                id: format!("contact_{}", stored.contacts.len() + 1),
                name: name.to_string(),
                phone,
                priority,
                active: true,
                created_at: Utc::now(),
            };
            stored.contacts.push(contact.clone());
            Ok(contact)
        })?;

        info!(contact_id = %contact.id, priority, "emergency contact added");
        Ok(contact)
    }

    /// Active contacts, ascending by priority. Ties keep insertion order.
    pub fn list_contacts(&self) -> Result<Vec<Contact>, BeaconError> {
        let mut contacts: Vec<Contact> = self
            .read()?
            .contacts
            .into_iter()
            .filter(|c| c.active)
            .collect();
        contacts.sort_by_key(|c| c.priority);
        Ok(contacts)
    }

    /// The highest-precedence active contact.
    pub fn primary_contact(&self) -> Result<Option<Contact>, BeaconError> {
        Ok(self.list_contacts()?.into_iter().next())
    }

    fn read(&self) -> Result<StoredConfig, BeaconError> {
        match std::fs::read(&self.config_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(BeaconError::storage),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredConfig::default()),
            Err(e) => Err(BeaconError::storage(e)),
        }
    }

    /// Read-modify-write under the writer lock, replacing the file atomically.
    fn update<T>(
        &self,
        mutate: impl FnOnce(&mut StoredConfig) -> Result<T, BeaconError>,
    ) -> Result<T, BeaconError> {
        let _guard = self
            .writer
            .lock()
            .map_err(|_| BeaconError::Internal("credential store lock poisoned".to_string()))?;

        let mut stored = self.read()?;
        let out = mutate(&mut stored)?;
        self.write(&stored)?;
        Ok(out)
    }

    fn write(&self, stored: &StoredConfig) -> Result<(), BeaconError> {
        let dir = match self.config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(BeaconError::storage)?;

        let json = serde_json::to_vec_pretty(stored).map_err(BeaconError::storage)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(BeaconError::storage)?;
        std::io::Write::write_all(&mut tmp, &json).map_err(BeaconError::storage)?;
        tmp.as_file().sync_all().map_err(BeaconError::storage)?;
        tmp.persist(&self.config_path)
            .map_err(|e| BeaconError::storage(e.error))?;

        debug!(path = %self.config_path.display(), "configuration record written");
        Ok(())
    }
}
