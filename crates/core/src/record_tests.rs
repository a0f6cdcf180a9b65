// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    created = { "created", EventKind::Created },
    updated = { "updated", EventKind::Updated },
    deleted = { "deleted", EventKind::Deleted },
    mixed_case = { "Deleted", EventKind::Deleted },
)]
fn event_kind_from_str(input: &str, expected: EventKind) {
    assert_eq!(input.parse::<EventKind>().unwrap(), expected);
}

#[test]
fn event_kind_rejects_unknown() {
    let err = "moved".parse::<EventKind>().unwrap_err();
    assert!(matches!(err, Error::InvalidEventKind(ref s) if s == "moved"));
}

#[test]
fn event_kind_display_matches_wire_name() {
    for kind in EventKind::ALL {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind));
    }
}

#[parameterized(
    plain = { "42", 42 },
    padded = { " 7 ", 7 },
    negative = { "-1", -1 },
)]
fn record_id_from_str(input: &str, expected: i64) {
    assert_eq!(input.parse::<RecordId>().unwrap(), RecordId(expected));
}

#[test]
fn record_id_rejects_non_numeric() {
    assert!("obs-1".parse::<RecordId>().is_err());
}

#[test]
fn record_id_serializes_as_bare_number() {
    assert_eq!(serde_json::to_string(&RecordId(5)).unwrap(), "5");
    let id: RecordId = serde_json::from_str("12").unwrap();
    assert_eq!(id.get(), 12);
}
