// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use tempfile::TempDir;

#[test]
fn explicit_path_wins() {
    let path = PathBuf::from("/tmp/natura/custom.toml");
    assert_eq!(resolve_path(Some(&path)).unwrap(), path);
}

#[test]
fn init_writes_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("natura").join("config.toml");

    let written = init(&path, None, false).unwrap();
    assert_eq!(written, ClientConfig::default());
    assert_eq!(ClientConfig::load(&path).unwrap(), written);
}

#[test]
fn init_keeps_url_override() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    init(&path, Some("https://natura.example.org"), false).unwrap();
    let loaded = ClientConfig::load(&path).unwrap();
    assert_eq!(loaded.base_url, "https://natura.example.org");
}

#[test]
fn init_rejects_bad_url_without_writing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    assert!(matches!(
        init(&path, Some("not a url"), false),
        Err(Error::Config(_))
    ));
    assert!(!path.exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "base_url = \"http://keep.me\"\n").unwrap();

    match init(&path, None, false) {
        Err(Error::ConfigExists(p)) => assert_eq!(p, path),
        other => panic!("expected ConfigExists, got {:?}", other),
    }
    assert!(std::fs::read_to_string(&path).unwrap().contains("keep.me"));
}

#[test]
fn init_force_overwrites() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "base_url = \"http://keep.me\"\n").unwrap();

    init(&path, None, true).unwrap();
    assert_eq!(ClientConfig::load(&path).unwrap(), ClientConfig::default());
}

#[test]
fn render_round_trips_through_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    let mut config = ClientConfig::default();
    config.realtime.max_retries = 0;
    config.max_pending_requests = Some(8);

    std::fs::write(&path, render(&config).unwrap()).unwrap();
    assert_eq!(ClientConfig::load(&path).unwrap(), config);
}
