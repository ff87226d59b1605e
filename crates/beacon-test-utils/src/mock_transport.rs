// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport provider.
//!
//! Unlike [`MockDispatcher`](crate::MockDispatcher), failures here are raw
//! provider errors, so tests can check how the dispatcher normalizes them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use beacon_core::{BeaconError, PhoneNumber, ProviderAuth, TransportProvider};

/// Behavior of one mocked provider operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportBehavior {
    /// Succeed with this id (or status string, for status lookups).
    Reply(String),
    /// Fail with a non-channel error carrying this detail.
    Error(String),
    /// Never answer.
    Hang,
}

/// One captured provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Message { to: String, from: String, body: String },
    Call { to: String, from: String, script: String },
    Status { message_id: String },
}

pub struct MockTransport {
    message: TransportBehavior,
    call: TransportBehavior,
    status: TransportBehavior,
    calls: Arc<Mutex<Vec<TransportCall>>>,
}

impl MockTransport {
    /// Every operation succeeds.
    pub fn new() -> Self {
        Self {
            message: TransportBehavior::Reply("SM-mock".to_string()),
            call: TransportBehavior::Reply("CA-mock".to_string()),
            status: TransportBehavior::Reply("delivered".to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_message(mut self, behavior: TransportBehavior) -> Self {
        self.message = behavior;
        self
    }

    pub fn with_call(mut self, behavior: TransportBehavior) -> Self {
        self.call = behavior;
        self
    }

    pub fn with_status(mut self, behavior: TransportBehavior) -> Self {
        self.status = behavior;
        self
    }

    pub async fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().await.clone()
    }

    async fn respond(&self, behavior: &TransportBehavior) -> Result<String, BeaconError> {
        match behavior {
            TransportBehavior::Reply(value) => Ok(value.clone()),
            TransportBehavior::Error(detail) => Err(BeaconError::Internal(detail.clone())),
            TransportBehavior::Hang => std::future::pending().await,
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportProvider for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    async fn create_message(
        &self,
        _auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> Result<String, BeaconError> {
        self.calls.lock().await.push(TransportCall::Message {
            to: to.to_string(),
            from: from.to_string(),
            body: body.to_string(),
        });
        self.respond(&self.message).await
    }

    async fn create_call(
        &self,
        _auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> Result<String, BeaconError> {
        self.calls.lock().await.push(TransportCall::Call {
            to: to.to_string(),
            from: from.to_string(),
            script: script.to_string(),
        });
        self.respond(&self.call).await
    }

    async fn message_status(
        &self,
        _auth: &ProviderAuth,
        message_id: &str,
    ) -> Result<String, BeaconError> {
        self.calls.lock().await.push(TransportCall::Status {
            message_id: message_id.to_string(),
        });
        self.respond(&self.status).await
    }
}
