// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the push channel.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use natura_core::{EventKind, Observation, PushMessage, RecordId};

use super::channel::{ChannelConfig, ChannelError, RealtimeChannel};
use super::state::ChannelState;
use super::transport_tests::{MockFrame, MockPushTransport};
use yare::parameterized;

type TestChannel = RealtimeChannel<Observation, MockPushTransport>;

fn test_config() -> ChannelConfig {
    ChannelConfig {
        url: "ws://localhost:7186/observationHub".to_string(),
        max_retries: 3,
        initial_delay_ms: 1,
        max_delay_secs: 1,
    }
}

fn make_channel() -> (TestChannel, MockPushTransport) {
    let transport = MockPushTransport::new();
    let channel = RealtimeChannel::with_transport(test_config(), transport.clone());
    (channel, transport)
}

fn observation(id: i64) -> Observation {
    Observation::new(RecordId(id), RecordId(10), RecordId(1))
}

fn created(id: i64) -> String {
    PushMessage::created(observation(id)).to_json().unwrap()
}

fn updated(id: i64) -> String {
    PushMessage::updated(observation(id)).to_json().unwrap()
}

fn deleted(id: i64) -> String {
    PushMessage::<Observation>::deleted(RecordId(id))
        .to_json()
        .unwrap()
}

/// Record the ids of every event of `kind`.
fn track(channel: &TestChannel, kind: EventKind) -> Arc<Mutex<Vec<i64>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    channel.on(kind, move |msg| sink.lock().unwrap().push(msg.record_id().get()));
    seen
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let (mut channel, transport) = make_channel();
    assert_eq!(channel.state(), ChannelState::Disconnected);

    channel.connect().await.unwrap();
    assert_eq!(channel.state(), ChannelState::Connected);
    assert_eq!(transport.urls(), vec!["ws://localhost:7186/observationHub"]);

    channel.disconnect().await.unwrap();
    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert!(!transport.connected());
}

#[tokio::test]
async fn test_events_routed_by_kind() {
    let (mut channel, transport) = make_channel();
    let created_ids = track(&channel, EventKind::Created);
    let updated_ids = track(&channel, EventKind::Updated);
    let deleted_ids = track(&channel, EventKind::Deleted);
    channel.connect().await.unwrap();

    transport.push_text(created(1));
    transport.push_text(updated(2));
    transport.push_text(deleted(3));
    transport.push_text(created(4));

    wait_until(|| {
        deleted_ids.lock().unwrap().len() == 1 && created_ids.lock().unwrap().len() == 2
    })
    .await;
    assert_eq!(*created_ids.lock().unwrap(), vec![1, 4]);
    assert_eq!(*updated_ids.lock().unwrap(), vec![2]);
    assert_eq!(*deleted_ids.lock().unwrap(), vec![3]);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_handlers_run_in_registration_order() {
    let (mut channel, transport) = make_channel();
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        channel.on(EventKind::Created, move |_| order.lock().unwrap().push(name));
    }
    assert_eq!(channel.handler_count(EventKind::Created), 3);
    channel.connect().await.unwrap();

    transport.push_text(created(1));

    wait_until(|| order.lock().unwrap().len() == 3).await;
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_deleted_carries_only_id() {
    let (mut channel, transport) = make_channel();
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&payloads);
    channel.on(EventKind::Deleted, move |msg| {
        sink.lock().unwrap().push(msg.clone());
    });
    channel.connect().await.unwrap();

    transport.push_text(r#"{"type":"deleted","id":7}"#);

    wait_until(|| !payloads.lock().unwrap().is_empty()).await;
    let msg = payloads.lock().unwrap()[0].clone();
    assert_eq!(msg, PushMessage::deleted(RecordId(7)));
    assert!(msg.record().is_none());

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_undecodable_frames_are_skipped() {
    let (mut channel, transport) = make_channel();
    let created_ids = track(&channel, EventKind::Created);
    channel.connect().await.unwrap();

    transport.push_text("not json");
    transport.push_text(r#"{"type":"renamed","id":1}"#);
    transport.push_text(created(5));

    wait_until(|| !created_ids.lock().unwrap().is_empty()).await;
    assert_eq!(*created_ids.lock().unwrap(), vec![5]);
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(channel.state(), ChannelState::Connected);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_keeps_handlers() {
    let (mut channel, transport) = make_channel();
    let created_ids = track(&channel, EventKind::Created);
    channel.connect().await.unwrap();

    transport.push_text(created(1));
    transport.push(MockFrame::Close);
    transport.push_text(created(2));
    transport.push(MockFrame::Error);
    transport.push_text(created(3));

    wait_until(|| created_ids.lock().unwrap().len() == 3).await;
    assert_eq!(*created_ids.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(transport.connect_count(), 3);
    assert_eq!(channel.state(), ChannelState::Connected);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_survives_failed_attempts() {
    let (mut channel, transport) = make_channel();
    let created_ids = track(&channel, EventKind::Created);
    channel.connect().await.unwrap();

    transport.fail_next_connects(2);
    transport.push(MockFrame::Close);
    transport.push_text(created(9));

    wait_until(|| !created_ids.lock().unwrap().is_empty()).await;
    assert_eq!(transport.connect_count(), 4);
    assert_eq!(channel.state(), ChannelState::Connected);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_exhausted_retries_reported_once() {
    let (mut channel, transport) = make_channel();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    channel.on_error(move |e| sink.lock().unwrap().push(e.to_string()));
    channel.connect().await.unwrap();

    transport.set_always_fail(true);
    transport.push(MockFrame::Close);

    wait_until(|| !errors.lock().unwrap().is_empty()).await;
    wait_until(|| channel.state() == ChannelState::Disconnected).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("3 attempts"));
    // One initial connect plus three retries.
    assert_eq!(transport.connect_count(), 4);
}

#[tokio::test]
async fn test_connect_after_exhaustion() {
    let (mut channel, transport) = make_channel();
    let created_ids = track(&channel, EventKind::Created);
    channel.connect().await.unwrap();

    transport.set_always_fail(true);
    transport.push(MockFrame::Close);
    wait_until(|| channel.state() == ChannelState::Disconnected).await;

    transport.set_always_fail(false);
    channel.connect().await.unwrap();
    transport.push_text(created(1));

    wait_until(|| !created_ids.lock().unwrap().is_empty()).await;
    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_initial_handshake_failure() {
    let (mut channel, transport) = make_channel();
    transport.fail_next_connects(1);

    let result = channel.connect().await;
    assert!(matches!(result, Err(ChannelError::Connection(_))));
    assert_eq!(channel.state(), ChannelState::Disconnected);

    // The transport stays with the channel for another try.
    channel.connect().await.unwrap();
    assert_eq!(channel.state(), ChannelState::Connected);
    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_connect_twice_fails() {
    let (mut channel, _transport) = make_channel();
    channel.connect().await.unwrap();

    let result = channel.connect().await;
    assert!(matches!(result, Err(ChannelError::AlreadyConnected)));

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_clears_handlers_and_is_idempotent() {
    let (mut channel, transport) = make_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    channel.on(EventKind::Created, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    channel.on_error(|_| {});
    channel.connect().await.unwrap();

    channel.disconnect().await.unwrap();
    channel.disconnect().await.unwrap();
    assert_eq!(channel.handler_count(EventKind::Created), 0);

    // A new session starts with a clean handler table.
    channel.connect().await.unwrap();
    let fresh = track(&channel, EventKind::Created);
    transport.push_text(created(1));
    wait_until(|| !fresh.lock().unwrap().is_empty()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    channel.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_handler_panic_does_not_stop_delivery() {
    let (mut channel, transport) = make_channel();
    channel.on(EventKind::Created, |msg| {
        if msg.record_id() == RecordId(1) {
            panic!("handler bug");
        }
    });
    let created_ids = track(&channel, EventKind::Created);
    channel.connect().await.unwrap();

    transport.push_text(created(1));
    transport.push_text(created(2));

    wait_until(|| created_ids.lock().unwrap().len() == 2).await;
    assert_eq!(*created_ids.lock().unwrap(), vec![1, 2]);
    assert_eq!(channel.state(), ChannelState::Connected);

    channel.disconnect().await.unwrap();
}

#[test]
fn test_config_from_client_config() {
    let mut config = crate::config::ClientConfig::default();
    config.realtime.max_retries = 0;
    let channel = ChannelConfig::from_client_config(&config).unwrap();
    assert_eq!(channel.url, "ws://localhost:7186/observationHub");
    assert_eq!(channel.max_retries, 0);
    assert_eq!(channel.initial_delay_ms, 100);
    assert_eq!(channel.max_delay_secs, 30);
}

/// Milliseconds from the first connect to each later one.
fn reconnect_offsets_ms(transport: &MockPushTransport) -> Vec<u128> {
    let times = transport.connect_times();
    times[1..]
        .iter()
        .map(|t| t.duration_since(times[0]).as_millis())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_backoff_doubles_up_to_max_delay() {
    let config = ChannelConfig {
        max_retries: 0,
        initial_delay_ms: 100,
        max_delay_secs: 1,
        ..test_config()
    };
    let transport = MockPushTransport::new();
    let mut channel: TestChannel = RealtimeChannel::with_transport(config, transport.clone());
    channel.connect().await.unwrap();

    transport.set_always_fail(true);
    transport.push(MockFrame::Close);
    wait_until(|| transport.connect_count() >= 7).await;

    // Gaps of 100, 200, 400, 800, then held at 1000.
    assert_eq!(
        reconnect_offsets_ms(&transport)[..6].to_vec(),
        vec![100, 300, 700, 1500, 2500, 3500]
    );
    assert!(matches!(
        channel.state(),
        ChannelState::Reconnecting { .. }
    ));
    channel.disconnect().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_zero_initial_delay_still_backs_off() {
    let config = ChannelConfig {
        max_retries: 0,
        initial_delay_ms: 0,
        max_delay_secs: 1,
        ..test_config()
    };
    let transport = MockPushTransport::new();
    let mut channel: TestChannel = RealtimeChannel::with_transport(config, transport.clone());
    channel.connect().await.unwrap();

    transport.set_always_fail(true);
    transport.push(MockFrame::Close);
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Attempts at 1, 3, 7, 15, 31, 63, 127 ms; the next is due at 255.
    assert_eq!(
        reconnect_offsets_ms(&transport),
        vec![1, 3, 7, 15, 31, 63, 127]
    );
    channel.disconnect().await.unwrap();
}

#[parameterized(
    zero_start = { 0, 30, 0, 1 },
    doubles = { 100, 30, 100, 200 },
    capped = { 100, 1, 800, 1000 },
    at_cap = { 100, 1, 1000, 1000 },
    zero_cap = { 100, 0, 100, 1 },
)]
fn test_next_delay(initial_ms: u64, max_secs: u64, current: u64, expected: u64) {
    let config = ChannelConfig {
        initial_delay_ms: initial_ms,
        max_delay_secs: max_secs,
        ..test_config()
    };
    assert_eq!(config.next_delay_ms(current), expected);
    assert!(config.first_delay_ms() >= 1);
}
