// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spoken announcement for the voice channel.

use beacon_core::{PatientContext, Urgency, VOICE_PAUSE};

pub fn urgency_phrase(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "CRITICAL EMERGENCY",
        Urgency::High => "HIGH PRIORITY EMERGENCY",
        Urgency::Medium => "MEDIUM PRIORITY ALERT",
        Urgency::Low => "LOW PRIORITY ALERT",
    }
}

fn subject(context: &PatientContext) -> String {
    let gender = context.gender.map(|g| g.label().to_ascii_lowercase());
    match (context.age, gender) {
        (Some(age), Some(gender)) => format!("{age} year old {gender} patient"),
        (Some(age), None) => format!("{age} year old patient"),
        (None, Some(gender)) => format!("{gender} patient"),
        (None, None) => "a patient".to_string(),
    }
}

pub(crate) fn compose(context: &PatientContext, urgency: Urgency) -> String {
    let announcement = format!(
        "{} from Novel Genetic Predictor system. Emergency alert for {}. \
         Please check your SMS for detailed information.",
        urgency_phrase(urgency),
        subject(context),
    );
    format!("{announcement} This message will repeat once. {VOICE_PAUSE} {announcement}")
}

#[cfg(test)]
mod tests {
    use beacon_core::Gender;

    use super::*;

    #[test]
    fn announcement_is_repeated_after_a_pause() {
        let ctx = PatientContext::default()
            .with_age(4)
            .with_gender(Gender::Female);
        let script = compose(&ctx, Urgency::High);

        let (first, second) = script.split_once(VOICE_PAUSE).unwrap();
        assert!(first.contains("HIGH PRIORITY EMERGENCY from Novel Genetic Predictor system."));
        assert!(first.contains("4 year old female patient"));
        assert!(first.trim_end().ends_with("This message will repeat once."));
        assert_eq!(
            second.trim(),
            first.trim().trim_end_matches(" This message will repeat once.")
        );
    }

    #[test]
    fn unknown_demographics_still_read_naturally() {
        let script = compose(&PatientContext::default(), Urgency::Low);
        assert!(script.contains("Emergency alert for a patient."));
    }

    #[test]
    fn script_is_deterministic() {
        let ctx = PatientContext::default().with_age(60);
        assert_eq!(compose(&ctx, Urgency::Critical), compose(&ctx, Urgency::Critical));
    }
}
