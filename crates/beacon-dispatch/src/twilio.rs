// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio REST transport.
//!
//! Messages and calls are created with form-encoded POSTs authenticated with
//! HTTP basic auth (account SID, auth token). Error bodies carry a numeric
//! `code` and a `message`, which are surfaced in the channel error.

use std::time::Duration;

use async_trait::async_trait;
use beacon_config::model::TransportConfig;
use beacon_core::{BeaconError, Channel, PhoneNumber, ProviderAuth, TransportProvider};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::debug;

use crate::twiml;

const API_VERSION: &str = "2010-04-01";

/// Upper bound for one HTTP exchange. Per-channel deadlines are enforced by
/// the dispatcher and are normally shorter.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: Option<i64>,
    message: String,
}

/// HTTP client for the Twilio Messages and Calls APIs.
#[derive(Debug, Clone)]
pub struct TwilioTransport {
    client: reqwest::Client,
    base_url: String,
    voice: String,
}

impl TwilioTransport {
    pub fn new(base_url: impl Into<String>, voice: impl Into<String>) -> Result<Self, BeaconError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| BeaconError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            voice: voice.into(),
        })
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, BeaconError> {
        Self::new(&config.api_base_url, &config.voice)
    }

    fn account_url(&self, auth: &ProviderAuth, resource: &str) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{}/{resource}",
            self.base_url, auth.account_id
        )
    }

    async fn post_form(
        &self,
        channel: Channel,
        auth: &ProviderAuth,
        resource: &str,
        form: &[(&str, &str)],
    ) -> Result<String, BeaconError> {
        let response = self
            .client
            .post(self.account_url(auth, resource))
            .basic_auth(&auth.account_id, Some(auth.secret.expose_secret()))
            .form(form)
            .send()
            .await
            .map_err(|e| request_failed(channel, e))?;

        let status = response.status();
        debug!(%channel, status = %status, "provider response received");
        let body = response
            .text()
            .await
            .map_err(|e| request_failed(channel, e))?;

        if !status.is_success() {
            return Err(BeaconError::channel(channel, api_error(status, &body)));
        }
        let created: ResourceResponse = serde_json::from_str(&body).map_err(|e| {
            BeaconError::Channel {
                channel,
                message: format!("unreadable provider response: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        Ok(created.sid)
    }
}

#[async_trait]
impl TransportProvider for TwilioTransport {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn create_message(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        body: &str,
    ) -> Result<String, BeaconError> {
        self.post_form(
            Channel::Text,
            auth,
            "Messages.json",
            &[("To", to.as_str()), ("From", from), ("Body", body)],
        )
        .await
    }

    async fn create_call(
        &self,
        auth: &ProviderAuth,
        to: &PhoneNumber,
        from: &str,
        script: &str,
    ) -> Result<String, BeaconError> {
        let markup = twiml::render(script, &self.voice);
        self.post_form(
            Channel::Voice,
            auth,
            "Calls.json",
            &[("To", to.as_str()), ("From", from), ("Twiml", markup.as_str())],
        )
        .await
    }

    async fn message_status(
        &self,
        auth: &ProviderAuth,
        message_id: &str,
    ) -> Result<String, BeaconError> {
        let url = self.account_url(auth, &format!("Messages/{message_id}.json"));
        let response = self
            .client
            .get(url)
            .basic_auth(&auth.account_id, Some(auth.secret.expose_secret()))
            .send()
            .await
            .map_err(|e| request_failed(Channel::Text, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_failed(Channel::Text, e))?;
        if !status.is_success() {
            return Err(BeaconError::channel(Channel::Text, api_error(status, &body)));
        }
        let parsed: StatusResponse = serde_json::from_str(&body).map_err(|e| {
            BeaconError::channel(Channel::Text, format!("unreadable status response: {e}"))
        })?;
        Ok(parsed.status)
    }
}

fn request_failed(channel: Channel, e: reqwest::Error) -> BeaconError {
    BeaconError::Channel {
        channel,
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse {
            code: Some(code),
            message,
        }) => format!("Twilio error {code}: {message}"),
        Ok(ApiErrorResponse { message, .. }) => format!("Twilio error: {message}"),
        Err(_) => format!("provider returned {status}: {body}"),
    }
}
