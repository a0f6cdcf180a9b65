// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for natura-core operations.

use thiserror::Error;

/// All possible errors that can occur in natura-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid event kind: '{0}'\n  hint: valid kinds are: created, updated, deleted")]
    InvalidEventKind(String),

    #[error("invalid record id: '{0}'\n  hint: record ids are integers")]
    InvalidRecordId(String),

    #[error("invalid coordinate: {field} = {value} (allowed range {min}..={max})")]
    InvalidCoordinate {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for natura-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
