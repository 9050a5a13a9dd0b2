//! HTTP exchange types and the pluggable transport.
//!
//! # Design
//! Requests and responses are plain data. [`crate::ClientsApi`] builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a [`Transport`] performs the round-trip in between. Swapping the
//! transport is how callers attach credentials, add middleware, or intercept
//! traffic in tests.

use std::fmt;

use async_trait::async_trait;

use crate::error::BoxError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data. `url` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// `reason` is the reason phrase the server sent on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes HTTP exchanges on behalf of [`crate::IroncladClient`].
///
/// Implementations must tolerate concurrent calls to `send`. `release` is
/// invoked exactly once, after the owning client is closed or dropped and
/// the last exchange in flight has finished.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one round-trip. Only failures that prevent any HTTP response
    /// from arriving are errors; 4xx and 5xx come back as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;

    /// Free connection resources held by the transport.
    fn release(&self) {}
}

/// Default transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-configured client, e.g. one carrying default
    /// authorization headers or proxy settings.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let reason = reason_phrase(&response);
        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

/// hyper only records the phrase when it differs from the canonical one for
/// the status. An empty phrase on a status without a canonical one falls back
/// to the numeric code.
fn reason_phrase(response: &reqwest::Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .filter(|phrase| !phrase.is_empty())
        .or_else(|| status.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
