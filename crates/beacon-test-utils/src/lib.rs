// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Beacon integration tests.
//!
//! Mock collaborators and a wired-up harness for fast, deterministic tests
//! that never reach a real provider.
//!
//! # Components
//!
//! - [`MockDispatcher`] - scripted per-channel outcomes with captured sends
//! - [`MockTransport`] - raw provider double, including errors and hangs
//! - [`TestHarness`] - orchestrator over a temp-dir store and a mock dispatcher

pub mod harness;
pub mod mock_dispatcher;
pub mod mock_transport;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_dispatcher::{MockDispatcher, MockOutcome, SentItem};
pub use mock_transport::{MockTransport, TransportBehavior, TransportCall};
