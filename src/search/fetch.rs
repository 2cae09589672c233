//! Time-bounded JSON GET requests against upstream services.
//!
//! [`HttpFetcher`] is the only place that talks to the network. Every call is
//! wrapped in a wall-clock timeout; when it elapses the request future is
//! dropped, which aborts the in-flight reqwest request and releases its
//! connection. Failures are classified into [`SearchError`] variants and
//! never retried here.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SearchError};

/// Default wall-clock budget for one upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = concat!("kinsearch/", env!("CARGO_PKG_VERSION"));

/// Something that can GET a URL and decode the body as JSON.
///
/// Implemented by [`HttpFetcher`] for real traffic; tests substitute
/// counting or canned implementations.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value>;
}

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// reqwest-backed [`Fetcher`] with a hard timeout and optional rate limit.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    rate_limiter: Option<DirectLimiter>,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeout and no rate limiting.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            timeout,
            rate_limiter: None,
        }
    }

    /// Limit outgoing requests to `per_second` using a token bucket.
    ///
    /// Waiting for a token happens before the per-request timeout starts, so
    /// the timeout bounds only the upstream call. A long queue (for example
    /// enriching a full result page) delays requests but never fails them.
    pub fn with_rate_limit(mut self, per_second: NonZeroU32) -> Self {
        self.rate_limiter = Some(RateLimiter::direct(Quota::per_second(per_second)));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, url: &Url) -> Result<Value> {
        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                debug!(path = url.path(), error = %e, "Upstream request failed");
                SearchError::NetworkOrTimeout
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::UpstreamHttp(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| {
            debug!(path = url.path(), error = %e, "Failed to read upstream body");
            SearchError::NetworkOrTimeout
        })?;

        serde_json::from_slice(&body).map_err(|_| SearchError::BadJson)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        // Queue time is not part of the request timeout.
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        // Only host and path are logged; the query string carries the
        // searched name.
        debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "GET");

        match tokio::time::timeout(self.timeout, self.fetch(url)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(path = url.path(), code = %err.code(), "Upstream request failed");
                Err(err)
            }
            Err(_) => {
                warn!(
                    path = url.path(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Upstream request timed out"
                );
                Err(SearchError::NetworkOrTimeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn default_timeout_is_in_range() {
        let fetcher = HttpFetcher::default();
        assert!(fetcher.timeout() >= Duration::from_secs(5));
        assert!(fetcher.timeout() <= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5));
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let url = Url::parse("http://127.0.0.1:9/records?name=x").unwrap();
        assert_matches!(
            fetcher.get_json(&url).await,
            Err(SearchError::NetworkOrTimeout)
        );
    }

    #[tokio::test]
    async fn rate_limit_spaces_requests_without_timing_them_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(500))
            .with_rate_limit(NonZeroU32::new(2).unwrap());
        let url = Url::parse(&format!("{}/records?name=x", server.uri())).unwrap();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            fetcher.get_json(&url).await.unwrap();
        }
        // Burst of two, then the third waits about half a second for a token,
        // which must not count against the 500 ms request timeout.
        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
