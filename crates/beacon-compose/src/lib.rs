// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic alert content.
//!
//! Both outputs are pure functions of their inputs. The text body always fits
//! one 160-character message segment; the voice script says its announcement
//! twice with a pause in between.

pub mod text;
pub mod voice;

use beacon_core::{PatientContext, Urgency};
use chrono::NaiveTime;

pub use text::{MAX_NOTES_IN_TEXT, MAX_TEXT_CHARS};

/// Builds the text body and voice script for an alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertComposer;

impl AlertComposer {
    pub fn new() -> Self {
        Self
    }

    /// Text body for the message channel. Never longer than [`MAX_TEXT_CHARS`].
    ///
    /// `at` is the local wall-clock time printed in the body and used to derive
    /// a case id when the context has none.
    pub fn compose_text(
        &self,
        context: &PatientContext,
        urgency: Urgency,
        notes: &str,
        at: NaiveTime,
    ) -> String {
        text::compose(context, urgency, notes, at)
    }

    /// Spoken announcement for the voice channel, repeated once.
    pub fn compose_voice_script(&self, context: &PatientContext, urgency: Urgency) -> String {
        voice::compose(context, urgency)
    }

    /// Case id the text body uses for `context` at time `at`.
    pub fn case_id(&self, context: &PatientContext, at: NaiveTime) -> String {
        text::case_id(context, at)
    }
}

/// Keep the first `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
