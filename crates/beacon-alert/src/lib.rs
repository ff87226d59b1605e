// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert orchestration and the audit ledger.
//!
//! [`AlertOrchestrator`] is the only public entry point for emergency dispatch.
//! It is built from an injected [`CredentialStore`](beacon_vault::CredentialStore)
//! and [`ChannelDispatcher`](beacon_core::ChannelDispatcher) and owns the
//! [`AlertLedger`] every attempt is written to.

pub mod id;
pub mod ledger;
pub mod orchestrator;

pub use id::AlertIdGenerator;
pub use ledger::AlertLedger;
pub use orchestrator::{probe_text, AlertOrchestrator, AlertOutcome, DispatchStage};
