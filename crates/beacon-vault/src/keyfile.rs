// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The key artifact: a file, separate from the configuration record, that
//! holds the data key protecting the transport secret.
//!
//! The key is generated on first use, written exactly once, and reused by
//! every later process. Two on-disk formats exist:
//! - `raw`: the hex data key, file mode 0600 on unix;
//! - `wrapped`: the data key sealed under an Argon2id-derived key, used when a
//!   passphrase is available at creation time.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use beacon_core::BeaconError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{self, SealedBox, KEY_LEN};
use crate::kdf::{self, KdfParams, SALT_LEN};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
enum KeyFile {
    Raw {
        version: u32,
        key: String,
    },
    Wrapped {
        version: u32,
        salt: String,
        kdf: KdfParams,
        wrapped_key: SealedBox,
    },
}

/// Handle on the key artifact. Caches the unwrapped key after first load.
pub struct KeyArtifact {
    path: PathBuf,
    passphrase: Option<SecretString>,
    kdf: KdfParams,
    cached: Mutex<Option<Zeroizing<[u8; KEY_LEN]>>>,
}

impl std::fmt::Debug for KeyArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyArtifact")
            .field("path", &self.path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl KeyArtifact {
    pub fn new(path: impl Into<PathBuf>, passphrase: Option<SecretString>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            passphrase,
            kdf,
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the key, or `None` if the artifact has never been created.
    pub fn load(&self) -> Result<Option<Zeroizing<[u8; KEY_LEN]>>, BeaconError> {
        let mut cached = self.lock()?;
        if let Some(key) = cached.as_ref() {
            return Ok(Some(key.clone()));
        }
        if !self.path.exists() {
            return Ok(None);
        }
        let key = self.read()?;
        *cached = Some(key.clone());
        Ok(Some(key))
    }

    /// Load the key, creating the artifact if this is the first use.
    pub fn load_or_create(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, BeaconError> {
        let mut cached = self.lock()?;
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }
        let key = match self.create()? {
            Some(key) => key,
            // Another process created it first.
            None => self.read()?,
        };
        *cached = Some(key.clone());
        Ok(key)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Option<Zeroizing<[u8; KEY_LEN]>>>, BeaconError> {
        self.cached
            .lock()
            .map_err(|_| BeaconError::Internal("key artifact lock poisoned".to_string()))
    }

    fn read(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, BeaconError> {
        let bytes = Zeroizing::new(std::fs::read(&self.path).map_err(BeaconError::storage)?);
        let file: KeyFile = serde_json::from_slice(&bytes).map_err(|e| {
            BeaconError::Encryption(format!(
                "key artifact {} is corrupted: {e}",
                self.path.display()
            ))
        })?;

        let key = match file {
            KeyFile::Raw { key, .. } => {
                let raw = Zeroizing::new(hex::decode(key).map_err(|e| {
                    BeaconError::Encryption(format!("key artifact encoding is corrupted: {e}"))
                })?);
                to_key(&raw)?
            }
            KeyFile::Wrapped {
                salt,
                kdf,
                wrapped_key,
                ..
            } => {
                let passphrase = self.passphrase.as_ref().ok_or_else(|| {
                    BeaconError::Encryption(
                        "key artifact is passphrase-protected but no passphrase was provided"
                            .to_string(),
                    )
                })?;
                let salt: [u8; SALT_LEN] = hex::decode(salt)
                    .ok()
                    .and_then(|s| s.try_into().ok())
                    .ok_or_else(|| BeaconError::Encryption("corrupted key salt".to_string()))?;
                let wrapping = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, kdf)?;
                let raw = Zeroizing::new(wrapped_key.open(&wrapping).map_err(|_| {
                    BeaconError::Encryption(
                        "invalid passphrase or corrupted key artifact".to_string(),
                    )
                })?);
                to_key(&raw)?
            }
        };

        debug!(path = %self.path.display(), "key artifact loaded");
        Ok(key)
    }

    /// Write a fresh artifact. Returns `None` if the file already exists.
    fn create(&self) -> Result<Option<Zeroizing<[u8; KEY_LEN]>>, BeaconError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(BeaconError::storage)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = match options.open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(BeaconError::storage(e)),
        };

        let key = Zeroizing::new(crypto::generate_key()?);
        let contents = match &self.passphrase {
            Some(passphrase) => {
                let salt = crypto::random_bytes::<SALT_LEN>()?;
                let wrapping =
                    kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, self.kdf)?;
                KeyFile::Wrapped {
                    version: FORMAT_VERSION,
                    salt: hex::encode(salt),
                    kdf: self.kdf,
                    wrapped_key: SealedBox::seal(&wrapping, &key[..])?,
                }
            }
            None => KeyFile::Raw {
                version: FORMAT_VERSION,
                key: hex::encode(&key[..]),
            },
        };
        let json = Zeroizing::new(serde_json::to_vec_pretty(&contents).map_err(BeaconError::storage)?);
        file.write_all(&json).map_err(BeaconError::storage)?;
        file.sync_all().map_err(BeaconError::storage)?;

        info!(
            path = %self.path.display(),
            wrapped = self.passphrase.is_some(),
            "key artifact created"
        );
        Ok(Some(key))
    }
}

fn to_key(raw: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, BeaconError> {
    let key: [u8; KEY_LEN] = raw.try_into().map_err(|_| {
        BeaconError::Encryption(format!("key artifact must hold {KEY_LEN} bytes"))
    })?;
    Ok(Zeroizing::new(key))
}
