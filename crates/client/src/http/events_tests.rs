// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the auth-failure broadcast.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::events::{AuthEvents, AuthFailure, AuthFailureReason};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn failure() -> AuthFailure {
    AuthFailure {
        reason: AuthFailureReason::RefreshRejected { status: 401 },
        path: "/observations".to_string(),
    }
}

#[test]
fn publish_reaches_listeners_in_subscription_order() {
    let events = AuthEvents::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        events.subscribe(move |_| {
            order.lock().unwrap().push(name);
            Ok(())
        });
    }

    assert_eq!(events.publish(&failure()), 3);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let events = AuthEvents::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    let id = events.subscribe(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert!(events.unsubscribe(id));
    assert!(!events.unsubscribe(id));
    assert_eq!(events.listener_count(), 0);
    assert_eq!(events.publish(&failure()), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_listener_does_not_block_others() {
    let events = AuthEvents::new();
    let calls = Arc::new(AtomicUsize::new(0));

    events.subscribe(|_| Err("redirect failed".into()));
    events.subscribe(|_| panic!("listener bug"));
    let c = Arc::clone(&calls);
    events.subscribe(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert_eq!(events.publish(&failure()), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(events.listener_count(), 3);
}

#[test]
fn listener_receives_failure_details() {
    let events = AuthEvents::new();
    let seen = Arc::new(Mutex::new(None));

    let s = Arc::clone(&seen);
    events.subscribe(move |f| {
        *s.lock().unwrap() = Some(f.clone());
        Ok(())
    });

    events.publish(&failure());
    assert_eq!(seen.lock().unwrap().as_ref(), Some(&failure()));
}

#[test]
fn listener_may_unsubscribe_itself_during_publish() {
    let events = Arc::new(AuthEvents::new());
    let slot = Arc::new(Mutex::new(None));

    let ev = Arc::clone(&events);
    let sl = Arc::clone(&slot);
    let id = events.subscribe(move |_| {
        if let Some(id) = sl.lock().unwrap().take() {
            ev.unsubscribe(id);
        }
        Ok(())
    });
    *slot.lock().unwrap() = Some(id);

    assert_eq!(events.publish(&failure()), 1);
    assert_eq!(events.listener_count(), 0);
}

#[test]
fn instances_are_independent() {
    let a = AuthEvents::new();
    let b = AuthEvents::new();
    a.subscribe(|_| Ok(()));
    assert_eq!(a.listener_count(), 1);
    assert_eq!(b.listener_count(), 0);
}

#[test]
fn failure_display_names_path() {
    let msg = failure().to_string();
    assert!(msg.contains("401"));
    assert!(msg.contains("/observations"));
}
