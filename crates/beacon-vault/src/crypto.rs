// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM sealing of small secrets.
//!
//! Every seal draws a fresh 96-bit nonce from the system CSPRNG; nonce reuse
//! under one key breaks GCM. Sealed values travel as hex in [`SealedBox`].

use beacon_core::BeaconError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// A sealed value as persisted: hex nonce plus hex ciphertext-with-tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBox {
    pub nonce: String,
    pub ciphertext: String,
}

fn cipher(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, BeaconError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| BeaconError::Encryption("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Fill a fixed-size buffer from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], BeaconError> {
    let mut buf = [0u8; N];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| BeaconError::Encryption("system random source unavailable".to_string()))?;
    Ok(buf)
}

/// Generate a random key suitable for AES-256-GCM.
pub fn generate_key() -> Result<[u8; KEY_LEN], BeaconError> {
    random_bytes::<KEY_LEN>()
}

/// Encrypt `plaintext`, returning the ciphertext (tag appended) and its nonce.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), BeaconError> {
    let nonce_bytes = random_bytes::<NONCE_LEN>()?;
    let mut in_out = plaintext.to_vec();
    cipher(key)?
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| BeaconError::Encryption("AES-256-GCM encryption failed".to_string()))?;
    Ok((in_out, nonce_bytes))
}

/// Decrypt and authenticate. Fails on a wrong key or any tampering.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, BeaconError> {
    let mut in_out = ciphertext.to_vec();
    let plaintext = cipher(key)?
        .open_in_place(Nonce::assume_unique_for_key(*nonce), Aad::empty(), &mut in_out)
        .map_err(|_| {
            BeaconError::Encryption(
                "decryption failed -- key artifact does not match the stored ciphertext".to_string(),
            )
        })?;
    Ok(plaintext.to_vec())
}

impl SealedBox {
    pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Self, BeaconError> {
        let (ciphertext, nonce) = seal(key, plaintext)?;
        Ok(Self {
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    pub fn open(&self, key: &[u8; KEY_LEN]) -> Result<Vec<u8>, BeaconError> {
        let nonce: [u8; NONCE_LEN] = hex::decode(&self.nonce)
            .ok()
            .and_then(|n| n.try_into().ok())
            .ok_or_else(|| BeaconError::Encryption("corrupted nonce".to_string()))?;
        let ciphertext = hex::decode(&self.ciphertext)
            .map_err(|e| BeaconError::Encryption(format!("corrupted ciphertext encoding: {e}")))?;
        open(key, &nonce, &ciphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = generate_key().unwrap();
        let sealed = SealedBox::seal(&key, b"secret456").unwrap();
        assert_eq!(sealed.open(&key).unwrap(), b"secret456");
    }

    #[test]
    fn sealing_twice_uses_fresh_nonces() {
        let key = generate_key().unwrap();
        let a = SealedBox::seal(&key, b"same").unwrap();
        let b = SealedBox::seal(&key, b"same").unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn ciphertext_never_contains_plaintext() {
        let key = generate_key().unwrap();
        let sealed = SealedBox::seal(&key, b"secret456").unwrap();
        assert!(!sealed.ciphertext.contains(&hex::encode(b"secret456")));
        // 16-byte GCM tag, hex encoded.
        assert_eq!(sealed.ciphertext.len(), (9 + 16) * 2);
    }

    #[test]
    fn wrong_key_is_an_encryption_error() {
        let sealed = SealedBox::seal(&generate_key().unwrap(), b"secret").unwrap();
        let err = sealed.open(&generate_key().unwrap()).unwrap_err();
        assert!(matches!(err, BeaconError::Encryption(_)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = generate_key().unwrap();
        let (mut ct, nonce) = seal(&key, b"do not tamper").unwrap();
        ct[0] ^= 0x01;
        assert!(open(&key, &nonce, &ct).is_err());
    }

    #[test]
    fn malformed_hex_is_reported() {
        let key = generate_key().unwrap();
        let mut sealed = SealedBox::seal(&key, b"x").unwrap();
        sealed.nonce = "zz".to_string();
        assert!(matches!(sealed.open(&key), Err(BeaconError::Encryption(_))));
    }
}
