// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel connection state shared with the pump task.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

const STATE_DISCONNECTED: u8 = 0;
const STATE_CONNECTING: u8 = 1;
const STATE_CONNECTED: u8 = 2;
const STATE_RECONNECTING: u8 = 3;

/// Snapshot of a channel's connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    /// Initial handshake in progress.
    Connecting,
    Connected,
    /// Connection lost; `attempt` counts reconnection tries so far.
    Reconnecting { attempt: u32 },
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Disconnected => write!(f, "disconnected"),
            ChannelState::Connecting => write!(f, "connecting"),
            ChannelState::Connected => write!(f, "connected"),
            ChannelState::Reconnecting { attempt } => {
                write!(f, "reconnecting (attempt {})", attempt)
            }
        }
    }
}

/// Connection state visible to both the pump task and the channel owner.
///
/// Uses atomic fields for lock-free reads.
#[derive(Debug)]
pub struct SharedChannelState {
    state: AtomicU8,
    attempt: AtomicU32,
}

impl SharedChannelState {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_DISCONNECTED),
            attempt: AtomicU32::new(0),
        }
    }

    /// Get the current state.
    pub fn get(&self) -> ChannelState {
        match self.state.load(Ordering::Acquire) {
            STATE_CONNECTING => ChannelState::Connecting,
            STATE_CONNECTED => ChannelState::Connected,
            STATE_RECONNECTING => ChannelState::Reconnecting {
                attempt: self.attempt.load(Ordering::Acquire),
            },
            _ => ChannelState::Disconnected,
        }
    }

    /// Set the state.
    pub fn set(&self, state: ChannelState) {
        let (raw, attempt) = match state {
            ChannelState::Disconnected => (STATE_DISCONNECTED, 0),
            ChannelState::Connecting => (STATE_CONNECTING, 0),
            ChannelState::Connected => (STATE_CONNECTED, 0),
            ChannelState::Reconnecting { attempt } => (STATE_RECONNECTING, attempt),
        };
        // Attempt first so a reader that sees RECONNECTING sees its count.
        self.attempt.store(attempt, Ordering::Release);
        self.state.store(raw, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_CONNECTED
    }
}

impl Default for SharedChannelState {
    fn default() -> Self {
        Self::new()
    }
}
