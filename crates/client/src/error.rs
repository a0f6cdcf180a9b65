// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::{ClientError, TransportError};
use crate::realtime::ChannelError;

/// All errors surfaced by the natura-client library.
///
/// Each subsystem has its own error type; this enum lets applications hold
/// any of them behind a single `?`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("http transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("realtime channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl Error {
    /// Returns true if the error means the session is gone and the user must
    /// log in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::Client(ClientError::AuthExpired))
    }
}

/// A specialized Result type for natura-client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
