// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for request descriptors and responses.

#![allow(clippy::unwrap_used)]

use super::descriptor::{HttpResponse, Method, RequestDescriptor};
use yare::parameterized;

#[test]
fn builder_collects_parts() {
    let req = RequestDescriptor::get("/api/species/search")
        .query("q", "heron")
        .query("limit", 10)
        .header("X-Trace", "abc");
    assert_eq!(req.method, Method::Get);
    assert_eq!(
        req.query,
        vec![
            ("q".to_string(), "heron".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
    assert_eq!(req.headers.len(), 1);
    assert!(req.body.is_none());
    assert_eq!(req.to_string(), "GET /api/species/search");
}

#[test]
fn json_body_is_serialized_once() {
    let req = RequestDescriptor::post("/auth/login")
        .json(&serde_json::json!({"username": "ana"}))
        .unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"username":"ana"}"#));
}

#[parameterized(
    plain = { "/auth/refresh", "/auth/refresh" },
    trailing = { "/auth/refresh/", "/auth/refresh" },
    with_query = { "/observations?limit=30", "/observations" },
    root = { "/", "/" },
)]
fn normalized_path(path: &str, expected: &str) {
    assert_eq!(RequestDescriptor::get(path).normalized_path(), expected);
}

#[parameterized(
    ok = { 200, true },
    created = { 201, true },
    no_content = { 204, true },
    redirect = { 302, false },
    unauthorized = { 401, false },
    server_error = { 500, false },
)]
fn response_success(status: u16, expected: bool) {
    assert_eq!(HttpResponse::new(status, "").is_success(), expected);
}

#[test]
fn response_body_helpers() {
    let mut resp = HttpResponse::new(200, r#"{"id":3}"#);
    resp.headers.push(("Content-Type".into(), "application/json".into()));
    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value["id"], 3);
    assert_eq!(resp.text(), r#"{"id":3}"#);
    assert_eq!(resp.header("content-type"), Some("application/json"));
    assert!(resp.header("etag").is_none());
}
