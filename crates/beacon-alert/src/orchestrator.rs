// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert orchestration.
//!
//! A dispatch moves through these stages:
//!
//! ```text
//! NotStarted -> CredentialsResolved -> ContentComposed -> ChannelsAttempted -> Classified -> Recorded
//! ```
//!
//! Only credential resolution can stop a dispatch early; it does so before any
//! channel is touched and without writing a record. Every dispatch that gets
//! past it ends with exactly one ledger entry, whatever the channels did.

use std::sync::Arc;

use beacon_compose::AlertComposer;
use beacon_core::alert::bound_notes;
use beacon_core::{
    AlertRecord, BeaconError, ChannelDispatcher, DeliveryStatus, DispatchStatus, PatientContext,
    PhoneNumber, TransportCredentials, Urgency,
};
use beacon_vault::CredentialStore;
use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use crate::id::AlertIdGenerator;
use crate::ledger::AlertLedger;

/// Stages of one dispatch, as logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    NotStarted,
    CredentialsResolved,
    ContentComposed,
    ChannelsAttempted,
    Classified,
    Recorded,
}

impl std::fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not_started",
            Self::CredentialsResolved => "credentials_resolved",
            Self::ContentComposed => "content_composed",
            Self::ChannelsAttempted => "channels_attempted",
            Self::Classified => "classified",
            Self::Recorded => "recorded",
        })
    }
}

/// Result of a dispatch that reached the channels.
#[derive(Debug, Clone)]
pub struct AlertOutcome {
    /// At least one channel accepted the alert.
    pub success: bool,
    pub status: DispatchStatus,
    /// Human-readable summary naming which channels got through.
    pub message: String,
    /// The ledger entry written for this dispatch.
    pub record: AlertRecord,
}

/// The single entry point for emergency dispatch.
pub struct AlertOrchestrator {
    store: Arc<CredentialStore>,
    dispatcher: Arc<dyn ChannelDispatcher>,
    composer: AlertComposer,
    ledger: Arc<AlertLedger>,
    ids: AlertIdGenerator,
}

impl AlertOrchestrator {
    /// Alert ids continue after the last record `ledger` holds, so ids stay
    /// unique across processes sharing one journal.
    pub fn new(
        store: Arc<CredentialStore>,
        dispatcher: Arc<dyn ChannelDispatcher>,
        ledger: AlertLedger,
    ) -> Self {
        let ids = match ledger.last_id() {
            Some(last) => AlertIdGenerator::after(&last),
            None => AlertIdGenerator::new(),
        };
        Self {
            store,
            dispatcher,
            composer: AlertComposer::new(),
            ledger: Arc::new(ledger),
            ids,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    /// Raise an alert on both channels and record the attempt.
    ///
    /// Returns `Err(BeaconError::Config)` when credentials are missing and
    /// `Err(BeaconError::CredentialsUnusable)` when they cannot be decrypted;
    /// nothing is sent or recorded in either case. Channel failures never
    /// surface as `Err`: they are classified into the outcome.
    pub async fn send_alert(
        &self,
        context: &PatientContext,
        urgency: Urgency,
        notes: &str,
        recipient: &PhoneNumber,
    ) -> Result<AlertOutcome, BeaconError> {
        let mut stage = DispatchStage::NotStarted;
        debug!(%stage, %urgency, "dispatch started");

        let credentials = self.resolve_credentials().await?;
        stage = DispatchStage::CredentialsResolved;
        debug!(%stage, account_id = credentials.account_id(), "dispatch stage");

        let now = Local::now();
        let alert_id = self.ids.next(now.naive_local());
        let body = self.composer.compose_text(context, urgency, notes, now.time());
        let script = self.composer.compose_voice_script(context, urgency);
        let case_id = self.composer.case_id(context, now.time());
        stage = DispatchStage::ContentComposed;
        debug!(%stage, %alert_id, %case_id, text_chars = body.chars().count(), "dispatch stage");

        let auth = &credentials.auth;
        let sender = credentials.sender_address.as_str();
        let (text, voice) = tokio::join!(
            self.dispatcher.send_text(auth, recipient, sender, &body),
            self.dispatcher.send_voice(auth, recipient, sender, &script),
        );
        stage = DispatchStage::ChannelsAttempted;
        debug!(%stage, %alert_id, text_ok = text.is_ok(), voice_ok = voice.is_ok(), "dispatch stage");

        let status = DispatchStatus::classify(text.is_ok(), voice.is_ok());
        stage = DispatchStage::Classified;
        debug!(%stage, %alert_id, %status, "dispatch stage");

        let (text_confirmation, text_error) = split(text);
        let (voice_confirmation, voice_error) = split(voice);
        let record = AlertRecord {
            alert_id: alert_id.clone(),
            timestamp: now.with_timezone(&Utc),
            case_id,
            urgency,
            message: body,
            recipient: recipient.clone(),
            delivery_status: status.delivery_status(),
            dispatch_status: status,
            text_confirmation,
            voice_confirmation,
            text_error,
            voice_error,
            notes: bound_notes(notes),
            context: context.clone(),
        };
        self.record(record.clone()).await?;
        stage = DispatchStage::Recorded;
        debug!(%stage, %alert_id, "dispatch stage");

        if status.is_success() {
            info!(%alert_id, %urgency, %status, "emergency alert dispatched");
        } else {
            warn!(
                %alert_id,
                %urgency,
                text_error = record.text_error.as_deref().unwrap_or_default(),
                voice_error = record.voice_error.as_deref().unwrap_or_default(),
                "emergency alert failed on both channels"
            );
        }

        Ok(AlertOutcome {
            success: status.is_success(),
            status,
            message: format!("Alert {alert_id}: {status}"),
            record,
        })
    }

    /// Send a text-only probe to check the configuration.
    ///
    /// No call is placed and nothing is recorded. Returns the provider
    /// confirmation id of the probe.
    pub async fn test_channel(&self, recipient: &PhoneNumber) -> Result<String, BeaconError> {
        let credentials = self.resolve_credentials().await?;
        let body = probe_text(Local::now().naive_local());
        let confirmation = self
            .dispatcher
            .send_text(
                &credentials.auth,
                recipient,
                &credentials.sender_address,
                &body,
            )
            .await?;
        info!(%confirmation, "test probe accepted");
        Ok(confirmation)
    }

    /// Copy of the ledger, most recent last.
    pub fn history(&self) -> Vec<AlertRecord> {
        self.ledger.history()
    }

    /// Ask the provider where the text message of `alert_id` stands.
    ///
    /// Alerts whose text was rejected report `Failed` without contacting the
    /// provider. Records are not updated.
    pub async fn delivery_status(&self, alert_id: &str) -> Result<DeliveryStatus, BeaconError> {
        let record = self
            .ledger
            .find(alert_id)
            .ok_or_else(|| BeaconError::Validation(format!("unknown alert id `{alert_id}`")))?;
        let Some(confirmation) = record.text_confirmation.as_deref() else {
            return Ok(DeliveryStatus::Failed);
        };
        let credentials = self.resolve_credentials().await?;
        self.dispatcher
            .delivery_status(&credentials.auth, confirmation)
            .await
    }

    async fn resolve_credentials(&self) -> Result<TransportCredentials, BeaconError> {
        let store = Arc::clone(&self.store);
        let resolved = tokio::task::spawn_blocking(move || store.get_credentials())
            .await
            .map_err(|e| BeaconError::Internal(format!("credential lookup task failed: {e}")))?;

        match resolved {
            Ok(Some(credentials)) => Ok(credentials),
            Ok(None) => {
                warn!("dispatch refused: transport credentials are not configured");
                Err(BeaconError::Config(
                    "transport credentials are not configured; run `beacon setup`".to_string(),
                ))
            }
            Err(e) => {
                warn!(error = %e, "dispatch refused: stored credentials are unusable");
                Err(BeaconError::CredentialsUnusable {
                    source: Box::new(e),
                })
            }
        }
    }

    /// Append to the ledger off the async workers; the journal write blocks.
    async fn record(&self, record: AlertRecord) -> Result<(), BeaconError> {
        let ledger = Arc::clone(&self.ledger);
        tokio::task::spawn_blocking(move || ledger.append(record))
            .await
            .map_err(|e| BeaconError::Internal(format!("ledger append task failed: {e}")))
    }
}

fn split(result: Result<String, BeaconError>) -> (Option<String>, Option<String>) {
    match result {
        Ok(confirmation) => (Some(confirmation), None),
        Err(e) => (None, Some(e.to_string())),
    }
}

/// Body of the configuration probe sent by [`AlertOrchestrator::test_channel`].
pub fn probe_text(at: chrono::NaiveDateTime) -> String {
    format!(
        "NGP Emergency System Test - {} - Configuration working correctly!",
        at.format("%Y-%m-%d %H:%M:%S")
    )
}
