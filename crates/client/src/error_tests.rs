// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    auth_expired = { Error::Client(ClientError::AuthExpired), "session expired" },
    http = { Error::Client(ClientError::Http { status: 503, body: "down".into() }), "503" },
    timeout = { Error::Client(ClientError::Timeout), "timed out" },
    connection = { Error::Channel(ChannelError::Connection("refused".into())), "refused" },
    config = { Error::Config(ConfigError::InvalidUrl { field: "base_url", url: "nope".into() }), "nope" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected), "{err}");
}

#[test]
fn only_auth_expired_requires_login() {
    assert!(Error::Client(ClientError::AuthExpired).is_auth_expired());
    assert!(!Error::Client(ClientError::Timeout).is_auth_expired());
    assert!(!Error::Channel(ChannelError::AlreadyConnected).is_auth_expired());
}

#[test]
fn error_from_client_error() {
    let err: Error = ClientError::QueueFull { limit: 4 }.into();
    assert!(matches!(err, Error::Client(ClientError::QueueFull { limit: 4 })));
}
