// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External messaging provider contract.

use async_trait::async_trait;

use crate::error::BeaconError;
use crate::phone::PhoneNumber;
use crate::types::ProviderAuth;

/// A third-party provider able to send text messages and place voice calls.
///
/// Implementations may fail with any error; the dispatcher normalizes them.
#[async_trait]
pub trait TransportProvider: Send + Sync + 'static {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Submit a text message. Returns the provider's message id.
    async fn create_message(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> Result<String, BeaconError>;

    /// Place a voice call that speaks `script`. Returns the provider's call id.
    async fn create_call(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> Result<String, BeaconError>;

    /// Fetch the provider's raw status string for a message id.
    async fn message_status(
        &self,
        auth: &ProviderAuth,
        message_id: &str,
    ) -> Result<String, BeaconError>;
}
