// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credentialed HTTP requests with transparent session refresh.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ AuthenticatedClient │────►│  Transport  │────►│   Backend   │
//! │  (refresh waves)    │◄────│   (trait)   │◄────│             │
//! └─────────┬───────────┘     └─────────────┘     └─────────────┘
//!           │ AuthFailed
//!           ▼
//! ┌─────────────────────┐
//! │     AuthEvents      │  (listener registry)
//! └─────────────────────┘
//! ```
//!
//! # Features
//!
//! - At most one credential refresh in flight
//! - Requests that hit 401 during a refresh wait in a FIFO queue and are
//!   replayed in arrival order
//! - Each request is retried at most once
//! - One `AuthFailed` broadcast per failed refresh wave
//! - Injectable transport trait for testing

mod client;
mod descriptor;
mod events;
mod transport;

pub use client::{AuthenticatedClient, ClientError, ClientOptions, ClientResult};
pub use descriptor::{HttpResponse, Method, RequestDescriptor};
pub use events::{AuthEvents, AuthFailure, AuthFailureReason, ListenerId, ListenerResult};
pub use transport::{CookieJar, HttpTransport, ReqwestTransport, TransportError, TransportFuture};



#[cfg(test)]
mod descriptor_tests;

#[cfg(test)]
mod events_tests;
