// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-segment text body.
//!
//! Full form:
//!
//! ```text
//! CRITICAL EMERGENCY - NGP Alert | Patient: 7yr Male | Case: C-1 | Symptoms: Seizures |
//! Notes: ... | Time: 14:05 | Please respond ASAP
//! ```
//!
//! When that exceeds [`MAX_TEXT_CHARS`] the symptoms and notes are dropped
//! and a short form pointing at the system is sent instead.

use beacon_core::{PatientContext, Urgency};
use chrono::NaiveTime;

use crate::truncate_chars;

/// Single-segment text message limit, in characters.
pub const MAX_TEXT_CHARS: usize = 160;

/// Caller notes longer than this are cut in the text body.
pub const MAX_NOTES_IN_TEXT: usize = 50;

const MAX_SYMPTOMS: usize = 3;

/// Case ids are cut to this length in the short form.
const SHORT_FORM_CASE_CHARS: usize = 40;

const DELIMITER: &str = " | ";

/// Findings worth naming in a text, in the order they are listed.
const SYMPTOM_CHECKLIST: [(&str, &str); 6] = [
    ("seizures", "Seizures"),
    ("cardiac_abnormalities", "Cardiac issues"),
    ("respiratory_issues", "Respiratory issues"),
    ("developmental_delay", "Dev delay"),
    ("intellectual_disability", "Intellectual disability"),
    ("failure_to_thrive", "Failure to thrive"),
];

pub fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "CRITICAL EMERGENCY",
        Urgency::High => "HIGH PRIORITY",
        Urgency::Medium => "MEDIUM PRIORITY",
        Urgency::Low => "LOW PRIORITY",
    }
}

/// The context's case id, or `CASE_HHMMSS` from `at`.
pub fn case_id(context: &PatientContext, at: NaiveTime) -> String {
    match &context.case_id {
        Some(id) => id.clone(),
        None => format!("CASE_{}", at.format("%H%M%S")),
    }
}

/// Up to three set findings, in checklist order.
pub fn key_symptoms(context: &PatientContext) -> Vec<&'static str> {
    SYMPTOM_CHECKLIST
        .iter()
        .filter(|(flag, _)| context.has_flag(flag))
        .map(|(_, label)| *label)
        .take(MAX_SYMPTOMS)
        .collect()
}

fn patient_summary(context: &PatientContext) -> String {
    let age = match context.age {
        Some(age) => format!("{age}yr"),
        None => "Unknown age".to_string(),
    };
    let gender = context.gender.map_or("Unknown", |g| g.label());
    format!("Patient: {age} {gender}")
}

pub(crate) fn compose(
    context: &PatientContext,
    urgency: Urgency,
    notes: &str,
    at: NaiveTime,
) -> String {
    let label = urgency_label(urgency);
    let patient = patient_summary(context);
    let case = case_id(context, at);
    let time = format!("Time: {}", at.format("%H:%M"));

    let mut parts = vec![
        format!("{label} - NGP Alert"),
        patient.clone(),
        format!("Case: {case}"),
    ];

    let symptoms = key_symptoms(context);
    if !symptoms.is_empty() {
        parts.push(format!("Symptoms: {}", symptoms.join(", ")));
    }

    // Collapse newlines and runs of spaces so the body stays on one line.
    let notes = notes.split_whitespace().collect::<Vec<_>>().join(" ");
    if !notes.is_empty() {
        parts.push(format!("Notes: {}", truncate_chars(&notes, MAX_NOTES_IN_TEXT)));
    }

    parts.push(time.clone());
    parts.push("Please respond ASAP".to_string());

    let full = parts.join(DELIMITER);
    if full.chars().count() <= MAX_TEXT_CHARS {
        return full;
    }

    let short = [
        label.to_string(),
        patient,
        format!("Case: {}", truncate_chars(&case, SHORT_FORM_CASE_CHARS)),
        time,
        "Check NGP system".to_string(),
    ]
    .join(DELIMITER);
    truncate_chars(&short, MAX_TEXT_CHARS)
}
