// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher behavior against a scripted transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use beacon_core::{BeaconError, Channel, ChannelDispatcher, DeliveryStatus, PhoneNumber, ProviderAuth};
use beacon_dispatch::TransportDispatcher;
use beacon_test_utils::{MockTransport, TransportBehavior, TransportCall};
use secrecy::SecretString;

fn auth() -> ProviderAuth {
    ProviderAuth {
        account_id: "AC1".to_string(),
        secret: SecretString::from("tok".to_string()),
    }
}

fn to() -> PhoneNumber {
    PhoneNumber::literal("+918319612060").unwrap()
}

fn dispatcher(transport: MockTransport) -> (TransportDispatcher, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let dispatcher = TransportDispatcher::new(
        transport.clone(),
        Duration::from_millis(100),
        Duration::from_millis(150),
    );
    (dispatcher, transport)
}

#[tokio::test]
async fn successful_sends_return_provider_ids() {
    let (dispatcher, transport) = dispatcher(MockTransport::new());

    let sms = dispatcher.send_text(&auth(), &to(), "+1555", "body").await.unwrap();
    let call = dispatcher.send_voice(&auth(), &to(), "+1555", "script").await.unwrap();
    assert_eq!(sms, "SM-mock");
    assert_eq!(call, "CA-mock");

    let calls = transport.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], TransportCall::Message { body, .. } if body == "body"));
    assert!(matches!(&calls[1], TransportCall::Call { to, .. } if to == "+918319612060"));
}

#[tokio::test]
async fn provider_error_becomes_channel_error() {
    let (dispatcher, _) = dispatcher(
        MockTransport::new().with_call(TransportBehavior::Error("carrier rejected".into())),
    );
    let err = dispatcher
        .send_voice(&auth(), &to(), "+1555", "script")
        .await
        .unwrap_err();
    match err {
        BeaconError::Channel { channel, message, .. } => {
            assert_eq!(channel, Channel::Voice);
            assert!(message.contains("carrier rejected"));
        }
        other => panic!("expected channel error, got {other:?}"),
    }
}

#[tokio::test]
async fn hung_provider_times_out_within_the_deadline() {
    let (dispatcher, _) =
        dispatcher(MockTransport::new().with_message(TransportBehavior::Hang));

    let started = Instant::now();
    let err = dispatcher
        .send_text(&auth(), &to(), "+1555", "body")
        .await
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(matches!(
        err,
        BeaconError::Timeout { channel: Channel::Text, duration } if duration == Duration::from_millis(100)
    ));
    assert!(err.is_channel_failure());
}

#[tokio::test]
async fn one_channel_hanging_does_not_hold_the_other() {
    let (dispatcher, _) = dispatcher(MockTransport::new().with_call(TransportBehavior::Hang));
    let (auth, to) = (auth(), to());

    let (text, voice) = tokio::join!(
        dispatcher.send_text(&auth, &to, "+1555", "body"),
        dispatcher.send_voice(&auth, &to, "+1555", "script"),
    );
    assert!(text.is_ok());
    assert!(matches!(voice, Err(BeaconError::Timeout { channel: Channel::Voice, .. })));
}

#[tokio::test]
async fn delivery_status_maps_provider_strings() {
    let (dispatcher, _) = dispatcher(
        MockTransport::new().with_status(TransportBehavior::Reply("undelivered".into())),
    );
    let status = dispatcher.delivery_status(&auth(), "SM-mock").await.unwrap();
    assert_eq!(status, DeliveryStatus::Undelivered);
}
