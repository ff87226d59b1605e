// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel dispatcher for deterministic orchestration tests.
//!
//! `MockDispatcher` implements `ChannelDispatcher` with a scripted outcome per
//! channel and captures every send for assertion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use beacon_core::{
    BeaconError, Channel, ChannelDispatcher, ChannelResult, DeliveryStatus, PhoneNumber,
    ProviderAuth,
};

/// What a mocked channel does when asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Accept and return a fresh confirmation id.
    Accept,
    /// Fail with a channel error carrying this detail.
    Fail(String),
}

/// One captured send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentItem {
    pub channel: Channel,
    pub account_id: String,
    pub to: PhoneNumber,
    pub from: String,
    pub content: String,
}

/// A scripted two-channel dispatcher.
pub struct MockDispatcher {
    text: Mutex<MockOutcome>,
    voice: Mutex<MockOutcome>,
    delay: Option<Duration>,
    delivery: DeliveryStatus,
    sent: Arc<Mutex<Vec<SentItem>>>,
}

impl MockDispatcher {
    /// Both channels accept.
    pub fn new() -> Self {
        Self {
            text: Mutex::new(MockOutcome::Accept),
            voice: Mutex::new(MockOutcome::Accept),
            delay: None,
            delivery: DeliveryStatus::Delivered,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(mut self, outcome: MockOutcome) -> Self {
        self.text = Mutex::new(outcome);
        self
    }

    pub fn with_voice(mut self, outcome: MockOutcome) -> Self {
        self.voice = Mutex::new(outcome);
        self
    }

    /// Sleep this long inside every send before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Status reported by `delivery_status` for any confirmation id.
    pub fn with_delivery_status(mut self, status: DeliveryStatus) -> Self {
        self.delivery = status;
        self
    }

    /// Change the text outcome for later sends.
    pub async fn set_text(&self, outcome: MockOutcome) {
        *self.text.lock().await = outcome;
    }

    /// Change the voice outcome for later sends.
    pub async fn set_voice(&self, outcome: MockOutcome) {
        *self.voice.lock().await = outcome;
    }

    /// Every send attempted so far, in arrival order.
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self, channel: Channel) -> usize {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|item| item.channel == channel)
            .count()
    }

    async fn handle(
        &self,
        channel: Channel,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        content: &str,
    ) -> ChannelResult {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().await.push(SentItem {
            channel,
            account_id: auth.account_id.clone(),
            to: to.clone(),
            from: from.to_string(),
            content: content.to_string(),
        });

        let outcome = match channel {
            Channel::Text => self.text.lock().await.clone(),
            Channel::Voice => self.voice.lock().await.clone(),
        };
        match outcome {
            MockOutcome::Accept => {
                let prefix = match channel {
                    Channel::Text => "mock-sms",
                    Channel::Voice => "mock-call",
                };
                Ok(format!("{prefix}-{}", uuid::Uuid::new_v4()))
            }
            MockOutcome::Fail(detail) => Err(BeaconError::channel(channel, detail)),
        }
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelDispatcher for MockDispatcher {
    async fn send_text(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> ChannelResult {
        self.handle(Channel::Text, auth, to, from, body).await
    }

    async fn send_voice(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> ChannelResult {
        self.handle(Channel::Voice, auth, to, from, script).await
    }

    async fn delivery_status(
        &self,
        _auth: &ProviderAuth,
        _confirmation_id: &str,
    ) -> Result<DeliveryStatus, BeaconError> {
        Ok(self.delivery)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn auth() -> ProviderAuth {
        ProviderAuth {
            account_id: "AC-test".to_string(),
            secret: SecretString::from("tok".to_string()),
        }
    }

    fn to() -> PhoneNumber {
        PhoneNumber::literal("+15550001111").unwrap()
    }

    #[tokio::test]
    async fn accepts_by_default_and_captures_sends() {
        let mock = MockDispatcher::new();
        let id = mock.send_text(&auth(), &to(), "+1555", "hello").await.unwrap();
        assert!(id.starts_with("mock-sms-"));
        let id = mock.send_voice(&auth(), &to(), "+1555", "script").await.unwrap();
        assert!(id.starts_with("mock-call-"));

        let sent = mock.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].content, "hello");
        assert_eq!(sent[1].channel, Channel::Voice);
        assert_eq!(sent[0].account_id, "AC-test");
    }

    #[tokio::test]
    async fn scripted_failure_is_a_channel_error() {
        let mock = MockDispatcher::new().with_voice(MockOutcome::Fail("busy".into()));
        let err = mock.send_voice(&auth(), &to(), "+1555", "s").await.unwrap_err();
        assert!(err.is_channel_failure());
        assert!(err.to_string().contains("busy"));
        assert_eq!(mock.sent_count(Channel::Voice).await, 1);
    }

    #[tokio::test]
    async fn outcomes_can_change_between_sends() {
        let mock = MockDispatcher::new();
        mock.set_text(MockOutcome::Fail("down".into())).await;
        assert!(mock.send_text(&auth(), &to(), "+1", "a").await.is_err());
        mock.set_text(MockOutcome::Accept).await;
        assert!(mock.send_text(&auth(), &to(), "+1", "b").await.is_ok());
    }
}
