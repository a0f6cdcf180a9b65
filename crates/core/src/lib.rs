// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! natura-core: Shared data model for the natura client runtime
//!
//! This crate provides the record types, the push wire protocol, and the
//! small amount of pure logic shared by the natura client library and CLI.
//! Nothing here performs I/O.

pub mod error;
pub mod observation;
pub mod protocol;
pub mod record;

pub use error::{Error, Result};
pub use observation::{
    NewObservation, Observation, ObservationPatch, ObservationStats, Species, User,
};
pub use protocol::PushMessage;
pub use record::{EventKind, Record, RecordId};
