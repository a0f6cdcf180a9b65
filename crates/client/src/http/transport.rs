// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP requests.
//!
//! A transport performs exactly one attempt of one request. Refresh and
//! replay logic lives above it in [`AuthenticatedClient`], so tests can swap
//! in a scripted transport.
//!
//! [`AuthenticatedClient`]: super::AuthenticatedClient

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};

use super::descriptor::{HttpResponse, Method, RequestDescriptor};

/// Cookie store shared by the HTTP transport and the push channel handshake.
pub type CookieJar = reqwest::cookie::Jar;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No connection could be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport's own deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The connection broke mid-exchange.
    #[error("request failed: {0}")]
    Request(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transports.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Transport trait for one-shot HTTP exchanges.
pub trait HttpTransport: Send + Sync {
    /// Send a request and buffer the full response.
    ///
    /// Non-2xx statuses are successful exchanges, not errors.
    fn send<'a>(&'a self, request: &'a RequestDescriptor) -> TransportFuture<'a, HttpResponse>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` that stores session cookies in `jar`.
    pub fn new(base_url: &str, jar: Arc<CookieJar>, timeout: Duration) -> TransportResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(ReqwestTransport { client, base_url })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(&self, request: &RequestDescriptor) -> TransportResult<reqwest::RequestBuilder> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        Ok(builder)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: &'a RequestDescriptor) -> TransportFuture<'a, HttpResponse> {
        Box::pin(async move {
            let response = self
                .build(request)?
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
                .collect();
            let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}
