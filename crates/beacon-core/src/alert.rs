// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert records and dispatch outcome classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::PatientContext;
use crate::phone::PhoneNumber;
use crate::types::{DeliveryStatus, Urgency};

/// Maximum characters of caller notes kept on a record.
pub const MAX_NOTES_CHARS: usize = 100;

/// Separates the spoken segments of a voice script. Transports render it as a
/// short silence.
pub const VOICE_PAUSE: &str = "[pause]";

/// Combined result of the two channel attempts of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    BothDelivered,
    TextOnly,
    VoiceOnly,
    BothFailed,
}

impl DispatchStatus {
    /// Classify from the two channel results. Order of completion is irrelevant.
    pub fn classify(text_ok: bool, voice_ok: bool) -> Self {
        match (text_ok, voice_ok) {
            (true, true) => Self::BothDelivered,
            (true, false) => Self::TextOnly,
            (false, true) => Self::VoiceOnly,
            (false, false) => Self::BothFailed,
        }
    }

    /// One accepted channel is enough for the alert to count as sent.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::BothFailed)
    }

    pub fn delivery_status(&self) -> DeliveryStatus {
        if self.is_success() {
            DeliveryStatus::Sent
        } else {
            DeliveryStatus::Failed
        }
    }
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BothDelivered => "both channels delivered",
            Self::TextOnly => "text delivered, voice failed",
            Self::VoiceOnly => "voice delivered, text failed",
            Self::BothFailed => "both channels failed",
        })
    }
}

/// Immutable audit entry written once per dispatch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub alert_id: String,
    pub timestamp: DateTime<Utc>,
    pub case_id: String,
    pub urgency: Urgency,
    pub message: String,
    pub recipient: PhoneNumber,
    pub delivery_status: DeliveryStatus,
    pub dispatch_status: DispatchStatus,
    /// Provider id of the accepted text message, if any.
    pub text_confirmation: Option<String>,
    /// Provider id of the placed voice call, if any.
    pub voice_confirmation: Option<String>,
    /// Failure detail per channel, kept for the audit trail.
    #[serde(default)]
    pub text_error: Option<String>,
    #[serde(default)]
    pub voice_error: Option<String>,
    pub notes: String,
    pub context: PatientContext,
}

/// Trim caller notes and bound them to [`MAX_NOTES_CHARS`].
pub fn bound_notes(notes: &str) -> String {
    notes.trim().chars().take(MAX_NOTES_CHARS).collect()
}
