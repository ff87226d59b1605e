// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dispatch tests over a mock dispatcher.

use std::sync::Arc;
use std::time::{Duration, Instant};

use beacon_alert::{AlertLedger, AlertOrchestrator};
use beacon_compose::MAX_TEXT_CHARS;
use beacon_core::{
    BeaconError, Channel, DeliveryStatus, DispatchStatus, Gender, PatientContext, Urgency,
};
use beacon_test_utils::harness::{TEST_ACCOUNT_ID, TEST_SENDER};
use beacon_test_utils::{MockDispatcher, MockOutcome, TestHarness};

fn patient() -> PatientContext {
    PatientContext::default()
        .with_case_id("CASE_900")
        .with_age(6)
        .with_gender(Gender::Female)
        .with_flag("seizures")
}

#[tokio::test]
async fn both_channels_delivered() {
    let harness = TestHarness::new().unwrap();
    let before = harness.orchestrator.history().len();

    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::Critical, "needs review", &TestHarness::recipient())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, DispatchStatus::BothDelivered);
    assert!(outcome.message.contains("both channels"));
    assert_eq!(harness.orchestrator.history().len(), before + 1);

    let record = &outcome.record;
    assert!(record.alert_id.starts_with("EMRG_"));
    assert_eq!(record.case_id, "CASE_900");
    assert_eq!(record.delivery_status, DeliveryStatus::Sent);
    assert!(record.text_confirmation.as_deref().unwrap().starts_with("mock-sms-"));
    assert!(record.voice_confirmation.as_deref().unwrap().starts_with("mock-call-"));
    assert_eq!(record.notes, "needs review");
    assert_eq!(record.context, patient());
    assert!(record.message.chars().count() <= MAX_TEXT_CHARS);
}

#[tokio::test]
async fn sends_use_stored_credentials_and_composed_content() {
    let harness = TestHarness::new().unwrap();
    harness
        .orchestrator
        .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
        .await
        .unwrap();

    let sent = harness.dispatcher.sent().await;
    assert_eq!(sent.len(), 2);
    for item in &sent {
        assert_eq!(item.account_id, TEST_ACCOUNT_ID);
        assert_eq!(item.from, TEST_SENDER);
        assert_eq!(item.to.as_str(), "+918319612060");
    }
    let text = sent.iter().find(|s| s.channel == Channel::Text).unwrap();
    let voice = sent.iter().find(|s| s.channel == Channel::Voice).unwrap();
    assert!(text.content.starts_with("HIGH PRIORITY - NGP Alert"));
    assert!(voice.content.contains("HIGH PRIORITY EMERGENCY"));
}

#[tokio::test]
async fn text_only_is_partial_success() {
    let harness = TestHarness::builder()
        .with_dispatcher(MockDispatcher::new().with_voice(MockOutcome::Fail("no answer".into())))
        .build()
        .unwrap();

    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, DispatchStatus::TextOnly);
    assert!(outcome.message.contains("voice failed"));
    assert!(outcome.record.text_confirmation.is_some());
    assert!(outcome.record.voice_confirmation.is_none());
    assert!(outcome.record.voice_error.as_deref().unwrap().contains("no answer"));
}

#[tokio::test]
async fn voice_only_is_partial_success() {
    let harness = TestHarness::builder()
        .with_dispatcher(MockDispatcher::new().with_text(MockOutcome::Fail("blocked".into())))
        .build()
        .unwrap();

    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::Low, "", &TestHarness::recipient())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, DispatchStatus::VoiceOnly);
    assert!(outcome.message.contains("text failed"));
    assert!(outcome.record.text_confirmation.is_none());
}

#[tokio::test]
async fn total_failure_is_still_recorded() {
    let harness = TestHarness::builder()
        .with_dispatcher(
            MockDispatcher::new()
                .with_text(MockOutcome::Fail("down".into()))
                .with_voice(MockOutcome::Fail("down".into())),
        )
        .build()
        .unwrap();

    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::Medium, "", &TestHarness::recipient())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.status, DispatchStatus::BothFailed);
    assert_eq!(harness.orchestrator.history().len(), 1);
    assert_eq!(harness.orchestrator.history()[0].delivery_status, DeliveryStatus::Failed);
}

#[tokio::test]
async fn missing_credentials_fail_fast_without_record() {
    let harness = TestHarness::builder().without_credentials().build().unwrap();

    let err = harness
        .orchestrator
        .send_alert(&patient(), Urgency::Critical, "", &TestHarness::recipient())
        .await
        .unwrap_err();

    assert!(matches!(err, BeaconError::Config(_)));
    assert!(harness.orchestrator.history().is_empty());
    assert!(harness.dispatcher.sent().await.is_empty());
}

#[tokio::test]
async fn undecryptable_credentials_fail_fast_without_record() {
    let harness = TestHarness::new().unwrap();
    std::fs::remove_file(harness.store.key_path()).unwrap();
    // Fresh orchestrator so the cached key is not reused.
    let store = Arc::new(beacon_vault::CredentialStore::new(
        harness.store.config_path(),
        beacon_vault::KeyArtifact::new(
            harness.store.key_path(),
            None,
            beacon_test_utils::harness::FAST_KDF,
        ),
        "1",
    ));
    let dispatcher = Arc::new(MockDispatcher::new());
    let orchestrator =
        AlertOrchestrator::new(store, dispatcher.clone(), AlertLedger::new(10));

    let err = orchestrator
        .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
        .await
        .unwrap_err();
    match &err {
        BeaconError::CredentialsUnusable { source } => {
            assert!(matches!(**source, BeaconError::Encryption(_)));
        }
        other => panic!("expected unusable credentials, got {other:?}"),
    }
    assert!(err.is_config_failure());
    assert!(orchestrator.history().is_empty());
    assert!(dispatcher.sent().await.is_empty());
}

#[tokio::test]
async fn channels_are_attempted_concurrently() {
    let harness = TestHarness::builder()
        .with_dispatcher(MockDispatcher::new().with_delay(Duration::from_millis(300)))
        .build()
        .unwrap();

    let started = Instant::now();
    harness
        .orchestrator
        .send_alert(&patient(), Urgency::Critical, "", &TestHarness::recipient())
        .await
        .unwrap();
    assert!(
        started.elapsed() < Duration::from_millis(550),
        "channels ran back to back: {:?}",
        started.elapsed()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_alerts_are_all_recorded_with_unique_ids() {
    let harness = TestHarness::new().unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let orchestrator = harness.orchestrator.clone();
            tokio::spawn(async move {
                let ctx = PatientContext::default().with_case_id(format!("CASE_{i}"));
                orchestrator
                    .send_alert(&ctx, Urgency::High, "", &TestHarness::recipient())
                    .await
            })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().unwrap().success);
    }

    let history = harness.orchestrator.history();
    assert_eq!(history.len(), 20);
    let mut ids: Vec<_> = history.iter().map(|r| r.alert_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn ledger_capacity_bounds_history() {
    let harness = TestHarness::builder().with_ledger_capacity(3).build().unwrap();
    for _ in 0..5 {
        harness
            .orchestrator
            .send_alert(&patient(), Urgency::Low, "", &TestHarness::recipient())
            .await
            .unwrap();
    }
    assert_eq!(harness.orchestrator.history().len(), 3);
}

#[tokio::test]
async fn journal_keeps_every_attempt() {
    let harness = TestHarness::builder()
        .with_ledger_capacity(1)
        .with_journal()
        .build()
        .unwrap();
    for _ in 0..3 {
        harness
            .orchestrator
            .send_alert(&patient(), Urgency::Low, "", &TestHarness::recipient())
            .await
            .unwrap();
    }

    let path = harness.journal_path.as_deref().unwrap();
    let replayed = AlertLedger::replay(path).unwrap();
    assert_eq!(replayed.len(), 3);
    assert_eq!(harness.orchestrator.history().len(), 1);
    assert_eq!(
        replayed.last().unwrap().alert_id,
        harness.orchestrator.history()[0].alert_id
    );
}

#[tokio::test]
async fn ids_stay_unique_across_orchestrators_sharing_a_journal() {
    let harness = TestHarness::builder().with_journal().build().unwrap();
    let path = harness.journal_path.clone().unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        // A fresh orchestrator per send, as with one CLI process per alert.
        let orchestrator = AlertOrchestrator::new(
            harness.store.clone(),
            harness.dispatcher.clone(),
            AlertLedger::with_journal(500, &path).unwrap(),
        );
        let outcome = orchestrator
            .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
            .await
            .unwrap();
        ids.push(outcome.record.alert_id);
    }

    let journaled: Vec<String> = AlertLedger::replay(&path)
        .unwrap()
        .into_iter()
        .map(|r| r.alert_id)
        .collect();
    assert_eq!(journaled, ids);
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3, "duplicate ids: {ids:?}");

    let restored = AlertLedger::with_journal(500, &path).unwrap();
    for id in &ids {
        assert_eq!(restored.find(id).unwrap().alert_id, *id);
    }
}

#[tokio::test]
async fn notes_are_bounded_on_the_record() {
    let harness = TestHarness::new().unwrap();
    let notes = format!("  {}  ", "n".repeat(300));
    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::Low, &notes, &TestHarness::recipient())
        .await
        .unwrap();
    assert_eq!(outcome.record.notes.chars().count(), 100);
}

#[tokio::test]
async fn test_message_sends_text_only_and_records_nothing() {
    let harness = TestHarness::new().unwrap();

    let confirmation = harness
        .orchestrator
        .test_channel(&TestHarness::recipient())
        .await
        .unwrap();

    assert!(confirmation.starts_with("mock-sms-"));
    assert_eq!(harness.dispatcher.sent_count(Channel::Voice).await, 0);
    let sent = harness.dispatcher.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.starts_with("NGP Emergency System Test - "));
    assert!(harness.orchestrator.history().is_empty());
}

#[tokio::test]
async fn test_message_reports_channel_failure() {
    let harness = TestHarness::builder()
        .with_dispatcher(MockDispatcher::new().with_text(MockOutcome::Fail("invalid from".into())))
        .build()
        .unwrap();
    let err = harness
        .orchestrator
        .test_channel(&TestHarness::recipient())
        .await
        .unwrap_err();
    assert!(err.is_channel_failure());
}

#[tokio::test]
async fn delivery_status_looks_up_the_text_confirmation() {
    let harness = TestHarness::builder()
        .with_dispatcher(MockDispatcher::new().with_delivery_status(DeliveryStatus::Delivered))
        .build()
        .unwrap();
    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
        .await
        .unwrap();

    let status = harness
        .orchestrator
        .delivery_status(&outcome.record.alert_id)
        .await
        .unwrap();
    assert_eq!(status, DeliveryStatus::Delivered);
    // The record itself is not rewritten.
    assert_eq!(harness.orchestrator.history()[0].delivery_status, DeliveryStatus::Sent);
}

#[tokio::test]
async fn rejected_text_reports_failed_even_when_voice_got_through() {
    let harness = TestHarness::builder()
        .with_dispatcher(
            MockDispatcher::new()
                .with_text(MockOutcome::Fail("blocked".into()))
                .with_delivery_status(DeliveryStatus::Delivered),
        )
        .build()
        .unwrap();
    let outcome = harness
        .orchestrator
        .send_alert(&patient(), Urgency::High, "", &TestHarness::recipient())
        .await
        .unwrap();
    assert_eq!(outcome.status, DispatchStatus::VoiceOnly);
    assert_eq!(outcome.record.delivery_status, DeliveryStatus::Sent);

    let status = harness
        .orchestrator
        .delivery_status(&outcome.record.alert_id)
        .await
        .unwrap();
    assert_eq!(status, DeliveryStatus::Failed);

    let unknown = harness.orchestrator.delivery_status("EMRG_nope").await;
    assert!(matches!(unknown, Err(BeaconError::Validation(_))));
}
