// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use natura_client::{ChannelError, ClientError, ConfigError};
use thiserror::Error;

/// All errors the natura CLI reports.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] ClientError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("no password for '{0}'\n  hint: set NATURA_PASSWORD")]
    MissingPassword(String),

    #[error("not logged in\n  hint: pass --username (or set NATURA_USERNAME)")]
    NotLoggedIn,

    #[error("config file already exists: {}\n  hint: use --force to overwrite", .0.display())]
    ConfigExists(PathBuf),

    #[error("no config directory on this system\n  hint: pass --config <path>")]
    NoConfigDir,

    #[error("session expired\n  hint: log in again with --username")]
    SessionExpired,

    #[error("stopped watching: {0}")]
    WatchStopped(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render config: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for CLI commands.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
