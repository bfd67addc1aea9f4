//! Transport collaborator contract
//!
//! The pagination core and the resource layers never talk to reqwest
//! directly. They depend on this trait, which performs one request/response
//! round trip and hands back status, decoded JSON body, and raw headers.
//! Authentication, retries, and rate limiting are this collaborator's
//! problem; `HttpClient` is the production implementation.

use crate::error::Result;
use crate::types::StringMap;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// One decoded HTTP response: status, JSON body (when present), raw headers.
///
/// The body is kept as an untyped `Value` so list endpoints can hand each
/// record through model materialization individually.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body, None when the response had no parseable body
    pub body: Option<Value>,
    /// Response headers, including every `Link` header value
    pub headers: HeaderMap,
}

impl RawResponse {
    /// All values of the `Link` header, in response order.
    pub fn link_values(&self) -> Vec<String> {
        self.headers
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(ToString::to_string)
            .collect()
    }
}

/// A collaborator that executes HTTP requests against the service.
///
/// Implementations must report non-success statuses as
/// [`Error::HttpStatus`](crate::Error::HttpStatus) and surface timeouts and
/// cancellations as their own error variants rather than swallowing them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET, always returning headers alongside the body.
    async fn get(
        &self,
        path: &str,
        headers: &StringMap,
        params: &[(String, String)],
    ) -> Result<RawResponse>;

    /// Issue a POST with a JSON body.
    async fn post(&self, path: &str, headers: &StringMap, body: Value) -> Result<RawResponse>;

    /// Issue a PUT with a JSON body.
    async fn put(&self, path: &str, headers: &StringMap, body: Value) -> Result<RawResponse>;
}
