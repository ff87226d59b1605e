// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel dispatch for Beacon.
//!
//! [`TransportDispatcher`] is the `ChannelDispatcher` used in production: it
//! puts a deadline on every provider call and turns every provider failure
//! into a channel-scoped error value. [`TwilioTransport`] is the provider it
//! talks to.

pub mod dispatcher;
pub mod twilio;
pub mod twiml;

pub use dispatcher::TransportDispatcher;
pub use twilio::TwilioTransport;
