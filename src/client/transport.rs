// Pluggable HTTP transport
//
// The client only needs one capability from the network: POST a request and
// hand back the status line plus an unread body. Tests plug in an in-memory
// transport; production uses reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::error;

use super::error::{BoxError, ClientError};

/// Outbound POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// POST with `Content-Type: application/json`
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// A response body that has not been read yet
#[async_trait]
pub trait ResponseBody: Send {
    async fn read(self: Box<Self>) -> Result<Vec<u8>, BoxError>;
}

#[async_trait]
impl ResponseBody for Vec<u8> {
    async fn read(self: Box<Self>) -> Result<Vec<u8>, BoxError> {
        Ok(*self)
    }
}

#[async_trait]
impl ResponseBody for reqwest::Response {
    async fn read(self: Box<Self>) -> Result<Vec<u8>, BoxError> {
        let bytes = self.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Status line, headers and an unread body
pub struct HttpResponse {
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    body: Box<dyn ResponseBody>,
}

impl HttpResponse {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: Vec<(String, String)>,
        body: impl ResponseBody + 'static,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body: Box::new(body),
        }
    }

    /// In-memory response with the canonical reason phrase for `status`
    pub fn buffered(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, reason_phrase(status), Vec::new(), body.into())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// 2xx
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub async fn bytes(self) -> Result<Vec<u8>, ClientError> {
        self.body.read().await.map_err(ClientError::Body)
    }

    /// Body as text; invalid UTF-8 is replaced rather than rejected
    pub async fn text(self) -> Result<String, ClientError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Reason phrase from the status line, when it differs from the standard one
///
/// hyper only records non-standard phrases; standard ones are left to
/// `canonical_reason`.
fn peer_reason_phrase(response: &reqwest::Response) -> Option<String> {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .filter(|phrase| !phrase.is_empty())
}

/// Network capability the client is built on: one POST, one response
///
/// Implementations must not retry and must not read the body eagerly.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).post(request).await
    }
}

/// Default transport backed by reqwest
///
/// Connection pooling is disabled: each call opens its own connection, and
/// the deadline is enforced by the caller rather than by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ClientError::Setup(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await.map_err(|e| {
            error!("HTTP request failed: {}", e);
            if e.is_connect() {
                error!("  → Error type: CONNECTION");
            } else if e.is_request() {
                error!("  → Error type: REQUEST");
            } else {
                error!("  → Error type: OTHER");
            }
            e
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let status_text = peer_reason_phrase(&response)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());

        Ok(HttpResponse::new(status.as_u16(), status_text, headers, response))
    }
}
