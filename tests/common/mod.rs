//! Shared test harness for integration tests.
//!
//! Provides [`TestArchive`], a [`wiremock`] server standing in for the
//! archive backend, plus a [`CountingFetcher`] wrapper that records how many
//! requests reached the network layer.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kinsearch::search::{
    ArchiveEndpoint, ArchiveProvider, Fetcher, HttpFetcher, ProviderRegistry, SearchLimits,
};
use kinsearch::Result;
use reqwest::Url;
use serde_json::Value;
use wiremock::MockServer;

/// Short timeout so timeout tests finish quickly.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

/// [`Fetcher`] wrapper counting calls that reach the network layer.
pub struct CountingFetcher {
    inner: HttpFetcher,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: HttpFetcher::new(timeout),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_json(url).await
    }
}

/// Mock archive backend with an [`ArchiveProvider`] pointed at it.
pub struct TestArchive {
    pub server: MockServer,
    pub fetcher: Arc<CountingFetcher>,
    pub provider: Arc<ArchiveProvider>,
}

impl TestArchive {
    pub async fn start() -> Self {
        Self::start_with(ArchiveEndpoint::Records, SearchLimits::default()).await
    }

    pub async fn start_with(endpoint: ArchiveEndpoint, limits: SearchLimits) -> Self {
        let server = MockServer::start().await;
        let fetcher = CountingFetcher::new(TEST_TIMEOUT);
        let provider = ArchiveProvider::new(
            &server.uri(),
            "Archive",
            endpoint,
            limits,
            fetcher.clone(),
        )
        .expect("mock server uri is a valid base url");

        Self {
            server,
            fetcher,
            provider: Arc::new(provider),
        }
    }

    /// Registry with the demo provider and this archive.
    pub fn registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(self.provider.clone());
        registry
    }
}
