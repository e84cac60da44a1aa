//! Feed retrieval.
//!
//! [`FeedFetcher`] is the seam between the service and the network; the
//! production implementation is [`HttpFetcher`]. Retries are left to callers.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Response};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::FetcherConfig;
use crate::error::{FeedError, FeedResult};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Retrieves the raw text of an iCalendar feed.
pub trait FeedFetcher: Send + Sync {
    /// Fetches the document at `url`.
    ///
    /// # Errors
    ///
    /// [`FeedError::Fetch`] for non-success statuses, [`FeedError::Network`]
    /// for transport failures, [`FeedError::InvalidUrl`] for malformed URLs.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FeedResult<String>>;
}

/// Fetches feeds over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given configuration.
    pub fn new(config: &FetcherConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FeedError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> FeedResult<String> {
        let parsed = Url::parse(url).map_err(|source| FeedError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        trace!(url = %parsed, "Requesting feed");

        let response = self
            .client
            .get(parsed)
            .header("Accept", "text/calendar, */*;q=0.5")
            .send()
            .await
            .map_err(|e| FeedError::from_transport(url, e))?;

        Self::read_body(url, response).await
    }

    async fn read_body(url: &str, response: Response) -> FeedResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        if !status.is_success() {
            warn!(url = %url, status = %status, "Feed request failed");
            return Err(FeedError::fetch(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::from_transport(url, e))?;

        debug!(url = %url, bytes = body.len(), "Fetched feed");
        Ok(body)
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FeedResult<String>> {
        Box::pin(self.get(url))
    }
}
