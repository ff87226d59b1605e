// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the orchestrator and the outside world.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod dispatcher;
pub mod transport;

pub use dispatcher::{ChannelDispatcher, ChannelResult};
pub use transport::TransportProvider;
