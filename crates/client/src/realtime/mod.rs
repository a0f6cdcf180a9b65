// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel for record mutation events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐ owns ┌─────────────┐     ┌───────────────┐
//! │ RealtimeChannel │─────►│  pump task  │◄────│ PushTransport │
//! │ (handler table) │      │ (reconnect) │     │    (trait)    │
//! └─────────────────┘      └──────┬──────┘     └───────────────┘
//!                                 │ decoded PushMessage
//!                                 ▼
//!                          handlers by kind
//! ```
//!
//! Handler registrations live in the channel, not the connection, so they
//! survive reconnects. Events missed while disconnected are not replayed.

mod channel;
mod state;
mod transport;

pub use channel::{ChannelConfig, ChannelError, ErrorHandler, EventHandler, RealtimeChannel};
pub use state::{ChannelState, SharedChannelState};
pub use transport::{PushFuture, PushTransport, TransportError, TransportResult, WebSocketTransport};


#[cfg(test)]
mod channel_tests;
