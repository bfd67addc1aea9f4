//! HTTP transport module
//!
//! The transport collaborator: executes requests, owns retry, backoff, and
//! rate limiting, and applies basic-key authentication. Everything above
//! this module depends on the [`Transport`] trait only, so tests can swap
//! in an in-memory transport.

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{RawResponse, Transport};

#[cfg(test)]
mod tests;
