// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push protocol frames for the realtime channel.
//!
//! The protocol is one-way: the server pushes mutation events for a single
//! topic, the client never answers. Frames carry no sequence number, so a
//! client cannot detect events lost while it was disconnected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{EventKind, Record, RecordId};

/// A mutation event pushed by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage<R> {
    /// A record was created.
    Created {
        /// Full current record.
        record: R,
    },

    /// A record was replaced.
    Updated {
        /// Full current record.
        record: R,
    },

    /// A record was removed.
    Deleted {
        /// Id of the removed record.
        id: RecordId,
    },
}

impl<R> PushMessage<R> {
    /// Creates a Created message.
    pub fn created(record: R) -> Self {
        PushMessage::Created { record }
    }

    /// Creates an Updated message.
    pub fn updated(record: R) -> Self {
        PushMessage::Updated { record }
    }

    /// Creates a Deleted message.
    pub fn deleted(id: RecordId) -> Self {
        PushMessage::Deleted { id }
    }

    /// Returns the kind of mutation this message describes.
    pub fn kind(&self) -> EventKind {
        match self {
            PushMessage::Created { .. } => EventKind::Created,
            PushMessage::Updated { .. } => EventKind::Updated,
            PushMessage::Deleted { .. } => EventKind::Deleted,
        }
    }

    /// Returns the full record, if this message carries one.
    pub fn record(&self) -> Option<&R> {
        match self {
            PushMessage::Created { record } | PushMessage::Updated { record } => Some(record),
            PushMessage::Deleted { .. } => None,
        }
    }
}

impl<R: Record> PushMessage<R> {
    /// Returns the id of the affected record.
    pub fn record_id(&self) -> RecordId {
        match self {
            PushMessage::Created { record } | PushMessage::Updated { record } => record.id(),
            PushMessage::Deleted { id } => *id,
        }
    }
}

impl<R: Serialize> PushMessage<R> {
    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<R: DeserializeOwned> PushMessage<R> {
    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
