// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record identity and mutation kinds.
//!
//! Every record the server pushes carries a unique integer id. Updates are
//! whole-record replacements, so the id is the only thing the client ever
//! needs to reconcile on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Server-assigned identifier of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    pub fn new(id: i64) -> Self {
        RecordId(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(RecordId)
            .map_err(|_| Error::InvalidRecordId(s.to_string()))
    }
}

/// A server-held entity that can be kept in a reconciled collection.
pub trait Record {
    /// Returns the record's unique id.
    fn id(&self) -> RecordId;
}

/// The kind of mutation a push event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new record was created. Payload is the full record.
    Created,
    /// An existing record was replaced. Payload is the full record.
    Updated,
    /// A record was removed. Payload is only its id.
    Deleted,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 3] = [EventKind::Created, EventKind::Updated, EventKind::Deleted];

    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" => Ok(EventKind::Created),
            "updated" => Ok(EventKind::Updated),
            "deleted" => Ok(EventKind::Deleted),
            _ => Err(Error::InvalidEventKind(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
