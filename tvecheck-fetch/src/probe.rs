//! Stream probes.
//!
//! A probe opens a channel's stream and reports healthy as soon as the first
//! non-empty chunk of data arrives; the rest of the transfer is dropped.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::client::HttpClient;
use crate::error::{FetchError, ProbeFailure};

/// Default hard limit on connect + first chunk.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Checks whether a stream URL delivers data.
#[async_trait]
pub trait StreamProbe: Send + Sync {
    /// Probes `url`. `Ok(())` means data flowed.
    async fn probe(&self, url: &str) -> Result<(), ProbeFailure>;
}

/// HTTP implementation of [`StreamProbe`].
#[derive(Debug, Clone)]
pub struct HttpStreamProbe {
    client: HttpClient,
    timeout: Duration,
}

impl HttpStreamProbe {
    /// Creates a probe with the default 30 second limit.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_client(HttpClient::streaming()?))
    }

    /// Creates a probe around an existing client.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the limit on connect + first chunk.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured limit.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn first_chunk(&self, url: &str) -> Result<(), ProbeFailure> {
        let response = self
            .client
            .inner()
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeFailure::from_transport(&e, self.timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeFailure::Status(status.as_u16()));
        }

        let mut body = response.bytes_stream();
        match body.next().await {
            Some(Ok(chunk)) if !chunk.is_empty() => {
                debug!(bytes = chunk.len(), "First chunk received");
                Ok(())
            }
            Some(Ok(_)) => Err(ProbeFailure::NoVideo),
            Some(Err(e)) => Err(ProbeFailure::from_transport(&e, self.timeout)),
            None => Err(ProbeFailure::NoData),
        }
    }
}

#[async_trait]
impl StreamProbe for HttpStreamProbe {
    #[instrument(skip(self), fields(url = %url))]
    async fn probe(&self, url: &str) -> Result<(), ProbeFailure> {
        match tokio::time::timeout(self.timeout, self.first_chunk(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeFailure::Timeout(self.timeout)),
        }
    }
}
