// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! natura-client: client runtime for the natura observation platform.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌─────────────────────┐
//! │ AuthenticatedClient  │───────►│  HTTP backend       │
//! │ (single-flight       │◄───────│  (cookie session)   │
//! │  credential refresh) │        └─────────────────────┘
//! └──────────┬───────────┘                  ▲
//!            │ snapshot           shared    │
//!            ▼                    cookie jar│
//! ┌──────────────────────┐        ┌─────────┴───────────┐
//! │ CollectionReconciler │◄───────│  RealtimeChannel    │
//! │ (id-keyed, ordered)  │ events │  (push, reconnects) │
//! └──────────────────────┘        └─────────────────────┘
//! ```
//!
//! The client and the channel never call each other. Both ride the same
//! session cookie, and the surrounding application wires the snapshot and
//! the event stream into a reconciler.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod realtime;
pub mod reconcile;

pub use api::{AuthApi, ObservationsApi, SpeciesApi, UsersApi};
pub use config::{ClientConfig, ConfigError, RealtimeConfig};
pub use error::{Error, Result};
pub use http::{
    AuthEvents, AuthFailure, AuthenticatedClient, ClientError, ClientResult, CookieJar,
    ListenerId, RequestDescriptor,
};
pub use realtime::{ChannelConfig, ChannelError, ChannelState, RealtimeChannel};
pub use reconcile::{CollectionReconciler, SharedReconciler};
