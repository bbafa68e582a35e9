//! HTTP Client Abstraction
//!
//! The authenticated request primitive storage connectors are built on. A
//! connector never talks to the network directly; it hands an [`HttpRequest`]
//! to an injected [`HttpClient`] and gets back a status code plus body, or a
//! [`TransportError`]. This keeps connectors testable with a mock client and
//! keeps the actual transport (TLS, pooling, proxies) in one place.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::TransportError;

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.into()))
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(Bytes::from(json));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// HTTP response with the body fully buffered
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Get response body as UTF-8 string, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Ordered sequence of raw body chunks. The stream ends when the remote body
/// ends; a mid-stream transport failure is yielded as an `Err` item.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Response whose body arrives lazily, chunk by chunk.
///
/// The initial status line and headers are available immediately so the
/// caller can decide whether to consume the body at all.
pub struct StreamingResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub chunks: ByteStream,
}

/// Async HTTP client trait
///
/// Implementations own connection pooling, TLS and timeouts. They must not
/// retry on the connector's behalf and must not interpret status codes:
/// any response that made it to a status line is returned as `Ok`, however
/// unhappy the status; only failures below the status line are errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request, buffering the full body.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Execute an HTTP request, handing the body back as a chunk stream.
    ///
    /// Useful for large downloads that must not be held in memory.
    async fn stream(&self, request: HttpRequest) -> Result<StreamingResponse, TransportError>;
}
