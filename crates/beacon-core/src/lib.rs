// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Beacon emergency notification system.
//!
//! This crate provides the error type, the alert domain model, and the trait
//! seams (transport provider, channel dispatcher) that every other Beacon
//! crate builds on.

pub mod alert;
pub mod context;
pub mod error;
pub mod phone;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use alert::{AlertRecord, DispatchStatus, VOICE_PAUSE};
pub use context::{Gender, PatientContext};
pub use error::BeaconError;
pub use phone::{normalize_phone, PhoneNumber};
pub use traits::{ChannelDispatcher, ChannelResult, TransportProvider};
pub use types::{
    Channel, Contact, DeliveryStatus, ProviderAuth, TransportCredentials, Urgency,
};
