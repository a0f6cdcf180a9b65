// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod feed;
pub mod species;
pub mod user;
pub mod watch;
pub mod whoami;

use serde_json::Value;

use crate::error::Result;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
