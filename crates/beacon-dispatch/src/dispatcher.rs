// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deadline-bounded channel dispatch over a transport provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use beacon_config::model::BeaconConfig;
use beacon_core::{
    BeaconError, Channel, ChannelDispatcher, ChannelResult, DeliveryStatus, PhoneNumber,
    ProviderAuth, TransportProvider,
};
use tracing::{debug, info, warn};

use crate::twilio::TwilioTransport;

/// Production `ChannelDispatcher`.
///
/// Every provider call runs under the channel's deadline. Whatever the
/// provider returns on failure comes back as `BeaconError::Channel` for the
/// channel that was attempted; a missed deadline comes back as
/// `BeaconError::Timeout`.
pub struct TransportDispatcher {
    transport: Arc<dyn TransportProvider>,
    text_timeout: Duration,
    voice_timeout: Duration,
}

impl TransportDispatcher {
    pub fn new(
        transport: Arc<dyn TransportProvider>,
        text_timeout: Duration,
        voice_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            text_timeout,
            voice_timeout,
        }
    }

    /// Twilio transport with the configured deadlines.
    pub fn from_config(config: &BeaconConfig) -> Result<Self, BeaconError> {
        let transport = TwilioTransport::from_config(&config.transport)?;
        Ok(Self::new(
            Arc::new(transport),
            Duration::from_secs(config.dispatch.text_timeout_secs),
            Duration::from_secs(config.dispatch.voice_timeout_secs),
        ))
    }

    pub fn timeout_for(&self, channel: Channel) -> Duration {
        match channel {
            Channel::Text => self.text_timeout,
            Channel::Voice => self.voice_timeout,
        }
    }

    async fn attempt(
        &self,
        channel: Channel,
        call: impl Future<Output = Result<String, BeaconError>>,
    ) -> ChannelResult {
        let deadline = self.timeout_for(channel);
        let provider = self.transport.name();
        debug!(%channel, provider, timeout_ms = deadline.as_millis() as u64, "channel attempt started");

        match tokio::time::timeout(deadline, call).await {
            Ok(Ok(confirmation)) => {
                info!(%channel, provider, %confirmation, "channel accepted");
                Ok(confirmation)
            }
            Ok(Err(e)) => {
                let err = scope_to_channel(channel, e);
                warn!(%channel, provider, error = %err, "channel failed");
                Err(err)
            }
            Err(_elapsed) => {
                warn!(
                    %channel,
                    provider,
                    timeout_ms = deadline.as_millis() as u64,
                    "channel timed out"
                );
                Err(BeaconError::Timeout {
                    channel,
                    duration: deadline,
                })
            }
        }
    }
}

/// Normalize any provider failure into an error for `channel`.
fn scope_to_channel(channel: Channel, err: BeaconError) -> BeaconError {
    match err {
        BeaconError::Channel {
            channel: c,
            message,
            source,
        } if c == channel => BeaconError::Channel {
            channel,
            message,
            source,
        },
        BeaconError::Timeout { channel: c, duration } if c == channel => {
            BeaconError::Timeout { channel, duration }
        }
        other => BeaconError::Channel {
            channel,
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

#[async_trait]
impl ChannelDispatcher for TransportDispatcher {
    async fn send_text(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> ChannelResult {
        self.attempt(
            Channel::Text,
            self.transport.create_message(auth, to, from, body),
        )
        .await
    }

    async fn send_voice(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> ChannelResult {
        self.attempt(
            Channel::Voice,
            self.transport.create_call(auth, to, from, script),
        )
        .await
    }

    async fn delivery_status(
        &self,
        auth: &ProviderAuth,
        confirmation_id: &str,
    ) -> Result<DeliveryStatus, BeaconError> {
        let raw = self
            .attempt(
                Channel::Text,
                self.transport.message_status(auth, confirmation_id),
            )
            .await?;
        let status = DeliveryStatus::from_provider_status(&raw);
        debug!(confirmation_id, provider_status = %raw, %status, "delivery status fetched");
        Ok(status)
    }
}
