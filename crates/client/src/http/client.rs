// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated request pipeline.
//!
//! Provides a high-level interface for:
//! - Sending credentialed requests through an injectable transport
//! - Coordinating a single credential refresh per wave of 401s
//! - Replaying requests queued behind a refresh, in arrival order
//! - Broadcasting `AuthFailed` once when a refresh wave fails
//!
//! A refresh wave runs in its own task. Dropping the future of the request
//! that started it therefore cannot leave the in-flight flag set.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use crate::config::ClientConfig;

use super::descriptor::{HttpResponse, RequestDescriptor};
use super::events::{AuthEvents, AuthFailure, AuthFailureReason};
use super::transport::{CookieJar, HttpTransport, ReqwestTransport, TransportError};

/// Error type for authenticated requests.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The attempt exceeded the request timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a failure status.
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    /// The session could not be renewed, or renewal was not allowed.
    #[error("session expired\n  hint: log in again")]
    AuthExpired,

    /// Too many requests are already waiting on a refresh.
    #[error("too many requests waiting for credential refresh (limit {limit})")]
    QueueFull { limit: usize },

    /// A body could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input rejected before sending.
    #[error(transparent)]
    Invalid(#[from] natura_core::Error),
}

/// Result type for authenticated requests.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => ClientError::Timeout,
            other => ClientError::Network(other.to_string()),
        }
    }
}

/// Request pipeline settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deadline for each individual attempt.
    pub request_timeout: Duration,
    /// Path of the credential refresh endpoint.
    pub refresh_path: String,
    /// Endpoints whose 401 is final (login, signup).
    pub boundary_paths: Vec<String>,
    /// Cap on requests waiting for a refresh. `None` = unbounded.
    pub max_pending: Option<usize>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for ClientOptions {
    fn from(config: &ClientConfig) -> Self {
        ClientOptions {
            request_timeout: config.request_timeout(),
            refresh_path: config.refresh_path.clone(),
            boundary_paths: config.auth_boundary_paths.clone(),
            max_pending: config.max_pending_requests,
        }
    }
}

impl ClientOptions {
    /// True for endpoints where a 401 must not trigger a refresh.
    fn is_auth_boundary(&self, request: &RequestDescriptor) -> bool {
        let path = request.normalized_path();
        path == self.refresh_path.trim_end_matches('/')
            || self
                .boundary_paths
                .iter()
                .any(|p| p.trim_end_matches('/') == path)
    }
}

/// A request waiting for its replay, with the slot its result goes to.
struct PendingRequest {
    descriptor: RequestDescriptor,
    reply: oneshot::Sender<ClientResult<HttpResponse>>,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    pending: VecDeque<PendingRequest>,
}

/// Outcome of trying to join a refresh wave.
enum Wave {
    /// No refresh was running; the caller's request starts one.
    Lead(PendingRequest),
    /// Queued behind the running refresh.
    Queued,
    /// Queue is at its limit.
    Rejected(usize),
}

struct Inner<T> {
    transport: T,
    options: ClientOptions,
    events: Arc<AuthEvents>,
    refresh: Mutex<RefreshState>,
}

/// Credentialed HTTP client with single-flight credential refresh.
///
/// Cloning is cheap; clones share the transport, the refresh state, and the
/// auth-failure registry.
pub struct AuthenticatedClient<T: HttpTransport = ReqwestTransport> {
    inner: Arc<Inner<T>>,
}

impl<T: HttpTransport> Clone for AuthenticatedClient<T> {
    fn clone(&self) -> Self {
        AuthenticatedClient {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: HttpTransport> fmt::Debug for AuthenticatedClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("options", &self.inner.options)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

impl AuthenticatedClient<ReqwestTransport> {
    /// Create a client with the reqwest transport.
    ///
    /// `jar` holds the session cookies; share it with the realtime channel
    /// so both ride the same session.
    pub fn new(
        config: &ClientConfig,
        jar: Arc<CookieJar>,
        events: Arc<AuthEvents>,
    ) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(&config.base_url, jar, config.request_timeout())?;
        Ok(Self::with_transport(
            ClientOptions::from(config),
            transport,
            events,
        ))
    }
}

impl<T: HttpTransport> AuthenticatedClient<T> {
    /// The auth-failure registry this client broadcasts to.
    pub fn auth_events(&self) -> &Arc<AuthEvents> {
        &self.inner.events
    }

    /// Timeout, refresh path and queue limit this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// Check if a credential refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock_refresh().in_flight
    }

    /// Number of requests waiting for the current refresh.
    pub fn pending_count(&self) -> usize {
        self.lock_refresh().pending.len()
    }

    fn lock_refresh(&self) -> MutexGuard<'_, RefreshState> {
        self.inner
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: HttpTransport + 'static> AuthenticatedClient<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(options: ClientOptions, transport: T, events: Arc<AuthEvents>) -> Self {
        AuthenticatedClient {
            inner: Arc::new(Inner {
                transport,
                options,
                events,
                refresh: Mutex::new(RefreshState::default()),
            }),
        }
    }

    /// Send a request, refreshing the session once if it has expired.
    ///
    /// Fails with [`ClientError::AuthExpired`] when the refresh fails or the
    /// target is an auth-boundary endpoint. Other failures surface as-is.
    pub async fn request(&self, descriptor: RequestDescriptor) -> ClientResult<HttpResponse> {
        let response = self.attempt(&descriptor).await?;
        if !response.is_unauthorized() {
            return into_result(response);
        }

        if self.inner.options.is_auth_boundary(&descriptor) {
            tracing::warn!(request = %descriptor, "unauthorized at auth boundary");
            self.inner.events.publish(&AuthFailure {
                reason: AuthFailureReason::BoundaryRejected,
                path: descriptor.path,
            });
            return Err(ClientError::AuthExpired);
        }

        let (reply, result) = oneshot::channel();
        match self.join_wave(PendingRequest { descriptor, reply }) {
            Wave::Lead(trigger) => {
                let client = self.clone();
                tokio::spawn(async move { client.run_wave(trigger).await });
            }
            Wave::Queued => {}
            Wave::Rejected(limit) => return Err(ClientError::QueueFull { limit }),
        }

        // A closed slot means the wave task died before answering.
        result.await.unwrap_or(Err(ClientError::AuthExpired))
    }

    /// Send a request and decode a JSON response body.
    pub async fn request_json<R: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> ClientResult<R> {
        let response = self.request(descriptor).await?;
        Ok(response.json()?)
    }

    /// Join the current refresh wave or start a new one.
    ///
    /// Reading and setting the in-flight flag happen under one lock with no
    /// await in between.
    fn join_wave(&self, request: PendingRequest) -> Wave {
        let mut state = self.lock_refresh();
        if !state.in_flight {
            state.in_flight = true;
            return Wave::Lead(request);
        }
        if let Some(limit) = self.inner.options.max_pending {
            if state.pending.len() >= limit {
                tracing::warn!(request = %request.descriptor, limit, "refresh queue full");
                return Wave::Rejected(limit);
            }
        }
        tracing::debug!(request = %request.descriptor, "queued behind credential refresh");
        state.pending.push_back(request);
        Wave::Queued
    }

    /// Refresh once, then settle the trigger and every queued request.
    async fn run_wave(&self, trigger: PendingRequest) {
        tracing::info!(request = %trigger.descriptor, "session expired, refreshing credentials");
        let outcome = self.refresh().await;

        let queued = {
            let mut state = self.lock_refresh();
            state.in_flight = false;
            std::mem::take(&mut state.pending)
        };
        let wave = std::iter::once(trigger).chain(queued);

        match outcome {
            Ok(()) => {
                tracing::info!("credentials refreshed, replaying requests");
                for request in wave {
                    let result = self.replay(&request.descriptor).await;
                    let _ = request.reply.send(result);
                }
            }
            Err(reason) => {
                let mut wave = wave.peekable();
                let path = wave
                    .peek()
                    .map(|r| r.descriptor.path.clone())
                    .unwrap_or_default();
                self.inner.events.publish(&AuthFailure { reason, path });
                for request in wave {
                    let _ = request.reply.send(Err(ClientError::AuthExpired));
                }
            }
        }
    }

    async fn refresh(&self) -> Result<(), AuthFailureReason> {
        let descriptor = RequestDescriptor::post(self.inner.options.refresh_path.clone());
        match self.attempt(&descriptor).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(AuthFailureReason::RefreshRejected {
                status: response.status,
            }),
            Err(e) => Err(AuthFailureReason::RefreshUnavailable(e.to_string())),
        }
    }

    /// Second and final attempt of a request after a refresh.
    async fn replay(&self, descriptor: &RequestDescriptor) -> ClientResult<HttpResponse> {
        let response = self.attempt(descriptor).await?;
        if response.is_unauthorized() {
            tracing::warn!(request = %descriptor, "still unauthorized after refresh");
            return Err(ClientError::AuthExpired);
        }
        into_result(response)
    }

    /// One transport attempt bounded by the request timeout.
    async fn attempt(&self, descriptor: &RequestDescriptor) -> ClientResult<HttpResponse> {
        tracing::debug!(request = %descriptor, "sending");
        let sent = tokio::time::timeout(
            self.inner.options.request_timeout,
            self.inner.transport.send(descriptor),
        )
        .await;

        match sent {
            Ok(Ok(response)) => {
                tracing::debug!(request = %descriptor, status = response.status, "received");
                Ok(response)
            }
            Ok(Err(e)) => {
                tracing::debug!(request = %descriptor, error = %e, "transport error");
                Err(e.into())
            }
            Err(_) => {
                tracing::debug!(request = %descriptor, "timed out");
                Err(ClientError::Timeout)
            }
        }
    }
}

fn into_result(response: HttpResponse) -> ClientResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Http {
            status: response.status,
            body: response.text(),
        })
    }
}
