// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential and contact storage for Beacon.
//!
//! The transport secret is sealed with AES-256-GCM under a data key kept in a
//! separate key artifact. The artifact is created on first use and can itself
//! be wrapped under an Argon2id-derived key when a passphrase is configured.

pub mod crypto;
pub mod kdf;
pub mod keyfile;
pub mod prompt;
pub mod store;

pub use keyfile::KeyArtifact;
pub use prompt::{key_passphrase, read_secret};
pub use store::CredentialStore;

/// Mask a secret for display, keeping four characters at each end.
///
/// Values shorter than ten characters are fully masked.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_secret_keeps_both_ends() {
        assert_eq!(mask_secret("ACabcdef0123456789"), "ACab...6789");
    }

    #[test]
    fn short_secret_is_fully_masked() {
        assert_eq!(mask_secret("abc123"), "****");
        assert_eq!(mask_secret(""), "****");
    }
}
