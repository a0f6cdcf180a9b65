// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so requests fail fast.
pub const DEAD_URL: &str = "http://127.0.0.1:1";

/// The binary with a scrubbed environment and its config dir under `home`.
pub fn natura(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("natura");
    cmd.env_remove("NATURA_CONFIG")
        .env_remove("NATURA_URL")
        .env_remove("NATURA_USERNAME")
        .env_remove("NATURA_PASSWORD")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

pub fn config_path(home: &TempDir) -> std::path::PathBuf {
    home.path().join("natura.toml")
}
