// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting push channel with persistent handler bindings.
//!
//! The channel owns the handler table and a pump task. The pump reads
//! frames, decodes them into [`PushMessage`]s and dispatches each to the
//! handlers registered for its kind. When the connection drops, the pump
//! reconnects with exponential backoff; handlers stay registered.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use natura_core::{EventKind, PushMessage};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, ConfigError};
use crate::http::CookieJar;

use super::state::{ChannelState, SharedChannelState};
use super::transport::{PushTransport, TransportError, WebSocketTransport};

/// Error type for push channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The initial handshake failed.
    #[error("push connection failed: {0}")]
    Connection(String),

    #[error("channel is already connected")]
    AlreadyConnected,

    /// Reconnection gave up.
    #[error("gave up reconnecting after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// The pump task died and took the transport with it.
    #[error("push transport was lost")]
    TransportLost,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Handler for one kind of push event.
pub type EventHandler<R> = Arc<dyn Fn(&PushMessage<R>) + Send + Sync>;

/// Handler for channel-level failure.
pub type ErrorHandler = Arc<dyn Fn(&ChannelError) + Send + Sync>;

/// Configuration for a push channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Full channel URL, topic included.
    pub url: String,
    /// Maximum reconnection attempts (0 = unlimited).
    pub max_retries: u32,
    /// Initial delay for exponential backoff (milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (seconds).
    pub max_delay_secs: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:7186/observationHub".to_string(),
            max_retries: 10,
            initial_delay_ms: 100,
            max_delay_secs: 30,
        }
    }
}

impl ChannelConfig {
    /// Build from client configuration, resolving the topic URL.
    pub fn from_client_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(ChannelConfig {
            url: config.realtime_url()?,
            max_retries: config.realtime.max_retries,
            initial_delay_ms: config.realtime.initial_delay_ms,
            max_delay_secs: config.realtime.max_delay_secs,
        })
    }

    fn max_delay_ms(&self) -> u64 {
        self.max_delay_secs.saturating_mul(1000)
    }

    /// Delay before the first reconnect attempt. Never zero.
    pub(crate) fn first_delay_ms(&self) -> u64 {
        self.initial_delay_ms.max(1)
    }

    /// Delay after `current`: doubled, capped at the max delay, never zero.
    pub(crate) fn next_delay_ms(&self, current: u64) -> u64 {
        current.saturating_mul(2).min(self.max_delay_ms()).max(1)
    }
}

struct HandlerTable<R> {
    created: Vec<EventHandler<R>>,
    updated: Vec<EventHandler<R>>,
    deleted: Vec<EventHandler<R>>,
    errors: Vec<ErrorHandler>,
}

impl<R> HandlerTable<R> {
    fn new() -> Self {
        HandlerTable {
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn for_kind(&self, kind: EventKind) -> &Vec<EventHandler<R>> {
        match kind {
            EventKind::Created => &self.created,
            EventKind::Updated => &self.updated,
            EventKind::Deleted => &self.deleted,
        }
    }

    fn for_kind_mut(&mut self, kind: EventKind) -> &mut Vec<EventHandler<R>> {
        match kind {
            EventKind::Created => &mut self.created,
            EventKind::Updated => &mut self.updated,
            EventKind::Deleted => &mut self.deleted,
        }
    }

    fn clear(&mut self) {
        self.created.clear();
        self.updated.clear();
        self.deleted.clear();
        self.errors.clear();
    }
}

type Handlers<R> = Arc<Mutex<HandlerTable<R>>>;

fn lock<R>(handlers: &Handlers<R>) -> MutexGuard<'_, HandlerTable<R>> {
    handlers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Running pump task; yields the transport back when it ends.
struct Pump<T> {
    cancel: CancellationToken,
    handle: JoinHandle<T>,
}

/// Push channel for one topic, delivering events of record type `R`.
pub struct RealtimeChannel<R, T: PushTransport = WebSocketTransport> {
    config: ChannelConfig,
    handlers: Handlers<R>,
    state: Arc<SharedChannelState>,
    /// Present while no pump owns it.
    transport: Option<T>,
    pump: Option<Pump<T>>,
}

impl<R> RealtimeChannel<R, WebSocketTransport>
where
    R: DeserializeOwned + Send + 'static,
{
    /// Create a channel using a WebSocket transport without cookies.
    pub fn new(config: ChannelConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }

    /// Create a channel whose handshake carries the session cookies in `jar`.
    pub fn with_cookies(config: ChannelConfig, jar: Arc<CookieJar>) -> Self {
        Self::with_transport(config, WebSocketTransport::with_cookies(jar))
    }
}

impl<R, T> RealtimeChannel<R, T>
where
    R: DeserializeOwned + Send + 'static,
    T: PushTransport + 'static,
{
    /// Create a channel with a custom transport (for testing).
    pub fn with_transport(config: ChannelConfig, transport: T) -> Self {
        RealtimeChannel {
            config,
            handlers: Arc::new(Mutex::new(HandlerTable::new())),
            state: Arc::new(SharedChannelState::new()),
            transport: Some(transport),
            pump: None,
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Register a handler for one event kind.
    ///
    /// Handlers for a kind run in registration order and survive reconnects.
    /// Registering while connected takes effect from the next event.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&PushMessage<R>) + Send + Sync + 'static,
    {
        lock(&self.handlers).for_kind_mut(kind).push(Arc::new(handler));
    }

    /// Register a handler for channel-level failure.
    ///
    /// Called once when reconnection gives up, never per frame.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&ChannelError) + Send + Sync + 'static,
    {
        lock(&self.handlers).errors.push(Arc::new(handler));
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        lock(&self.handlers).for_kind(kind).len()
    }

    pub fn state(&self) -> ChannelState {
        self.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Establish the connection and start delivering events.
    pub async fn connect(&mut self) -> Result<(), ChannelError> {
        if let Some(ref pump) = self.pump {
            // A pump that gave up reports Disconnected just before it exits.
            if !pump.handle.is_finished() && self.state.get() != ChannelState::Disconnected {
                return Err(ChannelError::AlreadyConnected);
            }
        }
        self.stop_pump().await;

        let mut transport = self.transport.take().ok_or(ChannelError::TransportLost)?;
        self.state.set(ChannelState::Connecting);
        tracing::debug!(url = %self.config.url, "connecting push channel");

        if let Err(e) = transport.connect(&self.config.url).await {
            self.transport = Some(transport);
            self.state.set(ChannelState::Disconnected);
            return Err(ChannelError::Connection(e.to_string()));
        }

        self.state.set(ChannelState::Connected);
        tracing::info!(url = %self.config.url, "push channel connected");

        let cancel = CancellationToken::new();
        let pump = PumpTask {
            config: self.config.clone(),
            handlers: Arc::clone(&self.handlers),
            state: Arc::clone(&self.state),
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(pump.run(transport));
        self.pump = Some(Pump { cancel, handle });
        Ok(())
    }

    /// Close the connection and discard every handler registration.
    ///
    /// Safe to call repeatedly. The channel can be connected again
    /// afterwards with fresh handlers.
    pub async fn disconnect(&mut self) -> Result<(), ChannelError> {
        self.stop_pump().await;
        lock(&self.handlers).clear();
        self.state.set(ChannelState::Disconnected);

        if let Some(ref mut transport) = self.transport {
            if transport.is_connected() {
                transport.disconnect().await?;
                tracing::info!(url = %self.config.url, "push channel disconnected");
            }
        }
        Ok(())
    }

    /// Cancel the pump, if any, and take the transport back.
    async fn stop_pump(&mut self) {
        let Some(pump) = self.pump.take() else {
            return;
        };
        pump.cancel.cancel();
        match pump.handle.await {
            Ok(transport) => self.transport = Some(transport),
            Err(e) => tracing::error!(error = %e, "push pump task failed"),
        }
    }
}

impl<R, T: PushTransport> fmt::Debug for RealtimeChannel<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeChannel")
            .field("config", &self.config)
            .field("state", &self.state.get())
            .finish()
    }
}

impl<R, T: PushTransport> Drop for RealtimeChannel<R, T> {
    fn drop(&mut self) {
        if let Some(ref pump) = self.pump {
            pump.cancel.cancel();
        }
    }
}

/// Everything the pump task needs besides the transport.
struct PumpTask<R> {
    config: ChannelConfig,
    handlers: Handlers<R>,
    state: Arc<SharedChannelState>,
    cancel: CancellationToken,
}

impl<R: DeserializeOwned> PumpTask<R> {
    /// Deliver frames until cancelled or reconnection gives up.
    async fn run<T: PushTransport>(self, mut transport: T) -> T {
        loop {
            let frame = tokio::select! {
                _ = self.cancel.cancelled() => None,
                frame = transport.recv() => Some(frame),
            };
            let error = match frame {
                None => return transport,
                Some(Ok(Some(text))) => {
                    self.dispatch(&text);
                    continue;
                }
                Some(Ok(None)) => TransportError::ConnectionClosed.to_string(),
                Some(Err(e)) => e.to_string(),
            };

            tracing::warn!(error = %error, "push connection lost");
            if !self.reconnect(&mut transport).await {
                return transport;
            }
        }
    }

    fn dispatch(&self, text: &str) {
        let message = match PushMessage::<R>::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable push frame");
                return;
            }
        };

        // Snapshot so handlers may register more handlers.
        let handlers = lock(&self.handlers).for_kind(message.kind()).clone();
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(&message))).is_err() {
                tracing::error!(kind = %message.kind(), "push event handler panicked");
            }
        }
    }

    /// Reconnect with exponential backoff.
    ///
    /// Returns false when cancelled or out of retries.
    async fn reconnect<T: PushTransport>(&self, transport: &mut T) -> bool {
        let _ = transport.disconnect().await;

        let mut attempt = 0u32;
        let mut delay_ms = self.config.first_delay_ms();

        loop {
            attempt = attempt.saturating_add(1);
            self.state.set(ChannelState::Reconnecting { attempt });

            let delay = Duration::from_millis(delay_ms);
            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = tokio::time::sleep(delay) => {}
            }

            let result = tokio::select! {
                _ = self.cancel.cancelled() => None,
                result = transport.connect(&self.config.url) => Some(result),
            };
            let error = match result {
                None => return false,
                Some(Ok(())) => {
                    self.state.set(ChannelState::Connected);
                    tracing::info!(attempt, "push channel reconnected");
                    return true;
                }
                Some(Err(e)) => e.to_string(),
            };

            tracing::warn!(attempt, error = %error, "push reconnect failed");

            // Check if we've exceeded max retries (0 = unlimited)
            if self.config.max_retries > 0 && attempt >= self.config.max_retries {
                self.state.set(ChannelState::Disconnected);
                tracing::error!(attempts = attempt, "giving up on push channel");
                self.report(&ChannelError::RetriesExhausted {
                    attempts: attempt,
                    last_error: error,
                });
                return false;
            }

            delay_ms = self.config.next_delay_ms(delay_ms);
        }
    }

    fn report(&self, error: &ChannelError) {
        let handlers = lock(&self.handlers).errors.clone();
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(error))).is_err() {
                tracing::error!("push error handler panicked");
            }
        }
    }
}
