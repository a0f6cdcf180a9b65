// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn default_config_values() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:7186");
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.refresh_path, "/auth/refresh");
    assert!(config.auth_boundary_paths.contains(&"/auth/login".to_string()));
    assert!(config.max_pending_requests.is_none());
    assert_eq!(config.realtime.topic, "observationHub");
    assert_eq!(config.realtime.max_retries, 10);
    assert_eq!(config.realtime.initial_delay_ms, 100);
    assert_eq!(config.realtime.max_delay_secs, 30);
    config.validate().unwrap();
}

#[test]
fn empty_file_yields_defaults() {
    let config: ClientConfig = toml::from_str("").unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn load_partial_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
base_url = "https://natura.example"
max_pending_requests = 8

[realtime]
max_retries = 0
"#,
    )
    .unwrap();

    let config = ClientConfig::load(&path).unwrap();
    assert_eq!(config.base_url, "https://natura.example");
    assert_eq!(config.max_pending_requests, Some(8));
    assert_eq!(config.realtime.max_retries, 0);
    assert_eq!(config.realtime.topic, "observationHub");
}

#[test]
fn save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");
    let mut config = ClientConfig::default();
    config.realtime.url = Some("wss://push.natura.example".into());
    config.save(&path).unwrap();

    assert_eq!(ClientConfig::load(&path).unwrap(), config);
}

#[test]
fn load_missing_explicit_file_fails() {
    let temp = TempDir::new().unwrap();
    let err = ClientConfig::load_or_default(Some(&temp.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_rejects_bad_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "base_url = [").unwrap();
    assert!(matches!(
        ClientConfig::load(&path).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[parameterized(
    not_a_url = { "localhost:7186" },
    wrong_scheme = { "ftp://localhost" },
    relative = { "/api" },
)]
fn validate_rejects_base_url(url: &str) {
    let config = ClientConfig {
        base_url: url.to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidUrl { field: "base_url", .. }
    ));
}

#[test]
fn validate_rejects_zero_limits() {
    let config = ClientConfig {
        max_pending_requests: Some(0),
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = ClientConfig {
        request_timeout_ms: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_reconnect_delay() {
    let mut config = ClientConfig::default();
    config.realtime.initial_delay_ms = 0;
    config.realtime.max_retries = 0;
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidValue {
            field: "realtime.initial_delay_ms",
            ..
        }
    ));
}

#[test]
fn load_rejects_zero_reconnect_delay() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[realtime]\ninitial_delay_ms = 0\n").unwrap();
    assert!(matches!(
        ClientConfig::load(&path),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[parameterized(
    derived_http = { "http://localhost:7186", None, "ws://localhost:7186/observationHub" },
    derived_https = { "https://natura.example/", None, "wss://natura.example/observationHub" },
    explicit = { "http://localhost:7186", Some("wss://push.example/hubs"), "wss://push.example/hubs/observationHub" },
)]
fn realtime_url(base: &str, realtime: Option<&str>, expected: &str) {
    let mut config = ClientConfig {
        base_url: base.to_string(),
        ..Default::default()
    };
    config.realtime.url = realtime.map(str::to_string);
    assert_eq!(config.realtime_url().unwrap(), expected);
}
