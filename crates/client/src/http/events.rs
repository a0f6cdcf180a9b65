// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Auth-failure broadcast.
//!
//! Callers never special-case 401 themselves. They subscribe once here and
//! react (tear down the session, show a login view) when a refresh wave
//! fails. One registry is shared by every clone of a client; tests construct
//! their own.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Why the session was declared dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailureReason {
    /// The refresh endpoint answered with a non-success status.
    RefreshRejected { status: u16 },
    /// The refresh call never produced a response.
    RefreshUnavailable(String),
    /// An auth-boundary endpoint (login, signup, refresh) answered 401.
    BoundaryRejected,
}

/// Payload delivered to auth-failure listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub reason: AuthFailureReason,
    /// Path of the request that started the failed wave.
    pub path: String,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            AuthFailureReason::RefreshRejected { status } => {
                write!(f, "credential refresh rejected with {} ({})", status, self.path)
            }
            AuthFailureReason::RefreshUnavailable(ref e) => {
                write!(f, "credential refresh failed: {} ({})", e, self.path)
            }
            AuthFailureReason::BoundaryRejected => {
                write!(f, "authentication rejected at {}", self.path)
            }
        }
    }
}

/// Handle returned by [`AuthEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Result a listener returns. Errors are logged, never propagated.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Listener = Arc<dyn Fn(&AuthFailure) -> ListenerResult + Send + Sync>;

/// Registry of auth-failure listeners.
pub struct AuthEvents {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<ListenerId, Listener>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        AuthEvents {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a listener. Listeners run in subscription order.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AuthFailure) -> ListenerResult + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(id, Arc::new(listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Invoke every registered listener.
    ///
    /// A listener that errors or panics is logged and skipped; the rest still
    /// run. Returns how many listeners completed successfully.
    pub fn publish(&self, failure: &AuthFailure) -> usize {
        // Snapshot so listeners may (un)subscribe without deadlocking.
        let listeners: Vec<(ListenerId, Listener)> = self
            .lock()
            .iter()
            .map(|(id, l)| (*id, Arc::clone(l)))
            .collect();

        tracing::info!(listeners = listeners.len(), "{}", failure);

        let mut delivered = 0;
        for (id, listener) in listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(failure))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::error!(listener = id.0, error = %e, "auth-failure listener failed");
                }
                Err(_) => {
                    tracing::error!(listener = id.0, "auth-failure listener panicked");
                }
            }
        }
        delivered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ListenerId, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
