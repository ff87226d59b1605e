// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform send contract over the text and voice channels.

use async_trait::async_trait;

use crate::error::BeaconError;
use crate::phone::PhoneNumber;
use crate::types::{DeliveryStatus, ProviderAuth};

/// Outcome of one channel attempt: the provider confirmation id, or the
/// failure (always `BeaconError::Channel` or `BeaconError::Timeout`).
pub type ChannelResult = Result<String, BeaconError>;

/// Sends over the two channels. Calls are independent of each other.
///
/// Implementations must never panic on provider failure and must return
/// every failure as a value.
#[async_trait]
pub trait ChannelDispatcher: Send + Sync + 'static {
    async fn send_text(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> ChannelResult;

    async fn send_voice(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> ChannelResult;

    /// Look up the current delivery state of a previously sent text message.
    async fn delivery_status(
        &self,
        auth: &ProviderAuth,
        confirmation_id: &str,
    ) -> Result<DeliveryStatus, BeaconError>;
}
