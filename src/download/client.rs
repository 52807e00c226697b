//! HTTP transport for the download engine.
//!
//! The engine talks to the network only through [`Fetcher`], so tests can
//! swap in a synthetic transport. [`HttpClient`] is the reqwest-backed
//! implementation used by the CLI.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::DownloadError;

/// Streamed response body.
pub type BodyStream = BoxStream<'static, Result<Bytes, DownloadError>>;

/// Response to a GET: the status code and the body, not yet read.
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as a stream of chunks.
    pub body: BodyStream,
}

impl FetchResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Issues GET requests on behalf of the download engine.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Sends a GET for `url`.
    ///
    /// Only failures to obtain a response are errors; a non-success status is
    /// returned as a normal [`FetchResponse`].
    async fn get(&self, url: &str) -> Result<FetchResponse, DownloadError>;
}

/// Per-request deadlines. `None` means no deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    /// Deadline for establishing the connection.
    pub connect: Option<Duration>,
    /// Deadline for the whole request, body included.
    pub request: Option<Duration>,
}

/// HTTP client for downloading files with streaming support.
///
/// Create once and share; clones reuse the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with no deadlines.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend or system
    /// configuration cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(Timeouts::default())
    }

    /// Creates a client with the given deadlines.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the client cannot be built.
    #[instrument(level = "debug")]
    pub fn with_timeouts(timeouts: Timeouts) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().gzip(true).user_agent(user_agent());
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(request) = timeouts.request {
            builder = builder.timeout(request);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str) -> Result<FetchResponse, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_request_error(url, e))?;

        let status = response.status().as_u16();
        debug!(status, "response received");

        let owned_url = url.to_string();
        let body = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| map_request_error(&owned_url, e)))
            .boxed();

        Ok(FetchResponse { status, body })
    }
}

fn map_request_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else if error.is_builder() {
        DownloadError::invalid_url(url)
    } else {
        DownloadError::network(url, error)
    }
}

fn user_agent() -> String {
    format!("dops/{}", env!("CARGO_PKG_VERSION"))
}
