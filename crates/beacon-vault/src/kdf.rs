// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id derivation of a key-wrapping key from an operator passphrase.

use beacon_config::model::VaultConfig;
use beacon_core::BeaconError;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters, persisted beside the wrapped key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<&VaultConfig> for KdfParams {
    fn from(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

/// Derive a 32-byte key (Argon2id v0x13). Zeroed on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    params: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, BeaconError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| BeaconError::Encryption(format!("invalid Argon2id parameters: {e}")))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, argon_params)
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| BeaconError::Encryption(format!("Argon2id key derivation failed: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_cost: 32768,
        iterations: 2,
        parallelism: 1,
    };

    #[test]
    fn same_inputs_same_key() {
        let a = derive_key(b"pass", &[1u8; SALT_LEN], FAST).unwrap();
        let b = derive_key(b"pass", &[1u8; SALT_LEN], FAST).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn salt_and_passphrase_both_matter() {
        let base = derive_key(b"pass", &[1u8; SALT_LEN], FAST).unwrap();
        let other_salt = derive_key(b"pass", &[2u8; SALT_LEN], FAST).unwrap();
        let other_pass = derive_key(b"word", &[1u8; SALT_LEN], FAST).unwrap();
        assert_ne!(*base, *other_salt);
        assert_ne!(*base, *other_pass);
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let params = KdfParams {
            parallelism: 0,
            ..FAST
        };
        assert!(derive_key(b"pass", &[1u8; SALT_LEN], params).is_err());
    }
}
