// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Beacon notification core.

use std::time::Duration;

use thiserror::Error;

use crate::types::Channel;

/// The primary error type used across all Beacon crates.
#[derive(Debug, Error)]
pub enum BeaconError {
    /// Transport credentials are missing or unusable. Fatal to a dispatch attempt.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport credentials are stored but cannot be used. Fatal to a
    /// dispatch attempt like `Config`; `source` holds the decryption or
    /// storage failure.
    #[error("configuration error: stored transport credentials are unusable: {source}")]
    CredentialsUnusable { source: Box<BeaconError> },

    /// Input rejected before any side effect (malformed phone number, empty field).
    #[error("validation error: {0}")]
    Validation(String),

    /// A single delivery channel failed at the transport provider.
    #[error("{channel} channel error: {message}")]
    Channel {
        channel: Channel,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single delivery channel did not answer within its deadline.
    #[error("{channel} channel timed out after {duration:?}")]
    Timeout { channel: Channel, duration: Duration },

    /// Key artifact or ciphertext could not be used (wrong key, tampering, bad encoding).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Persisted configuration resource could not be read or written.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BeaconError {
    /// Build a `Channel` error without an underlying source.
    pub fn channel(channel: Channel, message: impl Into<String>) -> Self {
        Self::Channel {
            channel,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap any error as a `Storage` error.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }

    /// Whether this error stops a dispatch before any channel is attempted.
    pub fn is_config_failure(&self) -> bool {
        matches!(self, Self::Config(_) | Self::CredentialsUnusable { .. })
    }

    /// Whether this error is a per-channel failure (transport error or timeout).
    pub fn is_channel_failure(&self) -> bool {
        matches!(self, Self::Channel { .. } | Self::Timeout { .. })
    }
}
