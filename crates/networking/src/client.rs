//! HTTP client implementation.

use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HTTP client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout")]
    Timeout,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Response error: {0}")]
    Response(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            ClientError::Response(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

/// HTTP client for asset and lookup requests.
#[derive(Debug)]
pub struct HttpClient {
    /// Inner reqwest client.
    inner: reqwest::Client,
    /// Client configuration.
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Maximum redirects.
    pub max_redirects: u32,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub max_connections_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: format!(
                "tank-icon/{} ({})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS
            ),
            max_connections_per_host: 16,
        }
    }
}

impl HttpClient {
    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(config.max_connections_per_host)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Fetch a URL and return the body bytes. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &Url) -> Result<Bytes, ClientError> {
        let response = self.inner.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }

    /// POST a JSON body and return the response body bytes. Non-2xx
    /// statuses are errors; the body is left for the caller to decode.
    pub async fn post_json<B>(&self, url: &Url, body: &B) -> Result<Bytes, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.inner.post(url.clone()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }

    /// Get client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// HTTP client builder.
#[derive(Debug)]
pub struct HttpClientBuilder {
    config: ClientConfig,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set maximum redirects.
    pub fn max_redirects(mut self, max: u32) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Set user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, ClientError> {
        HttpClient::with_config(self.config)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
