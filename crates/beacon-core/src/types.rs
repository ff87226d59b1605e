// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small enums and records shared by every Beacon crate.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::phone::PhoneNumber;

/// One of the two independent delivery mechanisms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Text,
    Voice,
}

/// Severity tag attached to an alert. Only affects wording, never routing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// All levels, least to most severe.
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];
}

/// Delivery state of a dispatched alert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
    Undelivered,
}

impl DeliveryStatus {
    /// Map a provider-reported message status onto the delivery lifecycle.
    ///
    /// Unrecognized statuses are treated as still in flight.
    pub fn from_provider_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "sent" => Self::Sent,
            "delivered" | "read" => Self::Delivered,
            "failed" | "canceled" => Self::Failed,
            "undelivered" => Self::Undelivered,
            _ => Self::Pending,
        }
    }

    /// Whether the status can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed | Self::Undelivered)
    }
}

/// Account identity used to authenticate against the transport provider.
///
/// Debug output never includes the secret.
#[derive(Clone)]
pub struct ProviderAuth {
    pub account_id: String,
    pub secret: SecretString,
}

impl std::fmt::Debug for ProviderAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAuth")
            .field("account_id", &self.account_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Decrypted transport credentials, held only in memory.
#[derive(Debug, Clone)]
pub struct TransportCredentials {
    pub auth: ProviderAuth,
    /// Address alerts are sent from. Stored verbatim as the provider assigned it.
    pub sender_address: String,
    pub configured: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl TransportCredentials {
    pub fn account_id(&self) -> &str {
        &self.auth.account_id
    }
}

/// A prioritized emergency contact. Lower priority value = contacted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: PhoneNumber,
    pub priority: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}
