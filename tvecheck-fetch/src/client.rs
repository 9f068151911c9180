//! HTTP client with tracing.
//!
//! Thin wrapper over `reqwest::Client` that fixes the user agent and the
//! timeout policy for the two kinds of traffic tvecheck sends:
//!
//! - API calls, bounded by a total request timeout
//! - stream probes, where the body never ends and the caller enforces its
//!   own deadline on connect + first chunk

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::FetchError;

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for tvecheck.
const USER_AGENT: &str = concat!("tvecheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper with tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a client for API calls with the default timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client for API calls with a custom total timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Creates a client for endless streams.
    ///
    /// No total timeout is set because a healthy stream never completes.
    /// Connections are not pooled so a dropped probe response closes its
    /// socket right away.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn streaming() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request.
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was received.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}
