//! Client entry point
//!
//! A [`RestClient`] owns the transport collaborator and hands out channel
//! handles and the push admin surface. All per-request behavior (auth,
//! retries, rate limiting) is configured once here and shared.

use crate::channel::{Channel, ChannelOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, Transport};
use crate::push::PushDeviceRegistrations;
use crate::types::OptionStringExt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default service host
pub const DEFAULT_HOST: &str = "rest.relay.io";

/// Client library options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API key in `name:secret` form
    pub key: Option<String>,
    /// Alternate service host, for development environments
    pub host: Option<String>,
    /// Whether to use TLS
    pub tls: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Transport-level retry count
    pub max_retries: u32,
    /// Rate limiter configuration, `None` to disable pacing
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            key: None,
            host: None,
            tls: true,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

impl ClientOptions {
    /// Options authenticated with an API key
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Create a new options builder
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }

    /// Assemble and validate the service base URL
    pub fn base_url(&self) -> Result<String> {
        let scheme = if self.tls { "https" } else { "http" };
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let base = format!("{scheme}://{host}");
        Url::parse(&base)?;
        Ok(base)
    }
}

/// Builder for client options
#[derive(Default)]
pub struct ClientOptionsBuilder {
    options: ClientOptions,
}

impl ClientOptionsBuilder {
    /// Set the API key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.options.key = Some(key.into());
        self
    }

    /// Set an alternate host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options.host = Some(host.into());
        self
    }

    /// Enable or disable TLS
    pub fn tls(mut self, tls: bool) -> Self {
        self.options.tls = tls;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set transport retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.options.max_retries = retries;
        self
    }

    /// Set the rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.options.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.options.rate_limit = None;
        self
    }

    /// Build the options
    pub fn build(self) -> ClientOptions {
        self.options
    }
}

/// REST client for the hosted messaging service
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    push: PushDeviceRegistrations,
}

impl RestClient {
    /// Create a client from options.
    ///
    /// Fails when the key is missing or malformed, or when the assembled
    /// base URL does not parse.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let key = options
            .key
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::config("an API key is required"))?;
        if !key.contains(':') {
            return Err(Error::config("API key must be in 'name:secret' form"));
        }

        let mut builder = HttpClientConfig::builder()
            .base_url(options.base_url()?)
            .key(key)
            .timeout(options.timeout)
            .max_retries(options.max_retries);
        builder = match &options.rate_limit {
            Some(config) => builder.rate_limit(config.clone()),
            None => builder.no_rate_limit(),
        };

        Ok(Self::with_transport(Arc::new(HttpClient::with_config(
            builder.build(),
        ))))
    }

    /// Create a client over an existing transport. The seam tests use to
    /// swap in an in-memory transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let push = PushDeviceRegistrations::new(Arc::clone(&transport));
        Self { transport, push }
    }

    /// Handle on a channel with default options
    pub fn channel(&self, name: impl Into<String>) -> Channel {
        self.channel_with_options(name, ChannelOptions::default())
    }

    /// Handle on a channel with explicit options
    pub fn channel_with_options(
        &self,
        name: impl Into<String>,
        options: ChannelOptions,
    ) -> Channel {
        Channel::new(Arc::clone(&self.transport), name, options)
    }

    /// Push device registration admin
    pub fn push(&self) -> &PushDeviceRegistrations {
        &self.push
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url().unwrap(), "https://rest.relay.io");
    }

    #[test]
    fn test_base_url_custom_host_no_tls() {
        let options = ClientOptions::builder()
            .host("sandbox.relay.io")
            .tls(false)
            .build();
        assert_eq!(options.base_url().unwrap(), "http://sandbox.relay.io");
    }

    #[test]
    fn test_client_requires_key() {
        let err = RestClient::new(ClientOptions::default()).unwrap_err();
        assert!(err.to_string().contains("API key is required"));

        let err = RestClient::new(ClientOptions::with_key("not-a-key")).unwrap_err();
        assert!(err.to_string().contains("name:secret"));
    }

    #[test]
    fn test_client_with_valid_key() {
        let client = RestClient::new(ClientOptions::with_key("app.keyid:secret"));
        assert!(client.is_ok());
    }
}
