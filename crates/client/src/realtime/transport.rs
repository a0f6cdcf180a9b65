// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the push connection.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Transports deliver raw text frames; decoding happens in the channel so a
//! bad frame never tears down the connection.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use reqwest::cookie::CookieStore;
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::http::CookieJar;

/// Error type for push transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for push transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by push transports.
pub type PushFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Transport trait for a receive-only push connection.
pub trait PushTransport: Send {
    /// Open a connection to `url`, replacing any previous one.
    fn connect(&mut self, url: &str) -> PushFuture<'_, ()>;

    /// Close the connection. Closing a closed transport is a no-op.
    fn disconnect(&mut self) -> PushFuture<'_, ()>;

    /// Receive the next text frame.
    ///
    /// Returns `None` if the connection is closed.
    fn recv(&mut self) -> PushFuture<'_, Option<String>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WebSocketConnection {
    sink: SplitSink<Socket, Message>,
    stream: SplitStream<Socket>,
}

/// WebSocket transport implementation using tokio-tungstenite.
///
/// With a cookie jar attached, the handshake carries the same session
/// cookies as the HTTP client.
#[derive(Default)]
pub struct WebSocketTransport {
    ws: Option<WebSocketConnection>,
    cookies: Option<Arc<CookieJar>>,
}

impl WebSocketTransport {
    /// Create a transport without session cookies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that sends the jar's cookies on every handshake.
    pub fn with_cookies(jar: Arc<CookieJar>) -> Self {
        WebSocketTransport {
            ws: None,
            cookies: Some(jar),
        }
    }

    /// Cookie header for a handshake to `url`, if the jar holds any.
    ///
    /// Cookies are stored against the HTTP origin, so the ws scheme is
    /// mapped back before the lookup.
    fn cookie_header(&self, url: &str) -> Option<HeaderValue> {
        let jar = self.cookies.as_ref()?;
        let mut origin = Url::parse(url).ok()?;
        let scheme = match origin.scheme() {
            "wss" | "https" => "https",
            _ => "http",
        };
        origin.set_scheme(scheme).ok()?;
        let value = jar.cookies(&origin)?;
        HeaderValue::from_bytes(value.as_bytes()).ok()
    }
}

impl PushTransport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> PushFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let mut request = url
                .as_str()
                .into_client_request()
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            if let Some(cookie) = self.cookie_header(&url) {
                request.headers_mut().insert(COOKIE, cookie);
            }

            let (ws_stream, _) = tokio_tungstenite::connect_async(request)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
            Ok(())
        })
    }

    fn disconnect(&mut self) -> PushFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                // The peer may already be gone.
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn recv(&mut self) -> PushFuture<'_, Option<String>> {
        Box::pin(async move {
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Some(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Ok(None);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames carry no events
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}
