//! HTTP client used to reach the catalog providers
//!
//! Features:
//! - HTTP/2 with adaptive window, TLS 1.3 via rustls
//! - Brotli and Gzip compression (auto-negotiated)
//! - Connection pooling with keep-alive
//!
//! Adapters never talk to `reqwest` directly. They go through [`FetchText`],
//! which keeps them testable with in-process fakes.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

/// Default `User-Agent` sent to providers.
pub const DEFAULT_USER_AGENT: &str = concat!("memeforge/", env!("CARGO_PKG_VERSION"));

/// Generic network-fetch capability: GET a URL and return the body as text.
#[async_trait]
pub trait FetchText: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Non-success status codes are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// HTTP client shared by every provider adapter
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Create a client with the default user agent
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a client that identifies itself with `user_agent`
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTION
            // ═══════════════════════════════════════════════════════════════
            // Don't assume HTTP/2 - let server negotiate
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .user_agent(user_agent)
            // ═══════════════════════════════════════════════════════════════
            // TIMEOUTS
            // ═══════════════════════════════════════════════════════════════
            // Per-adapter deadline is enforced by the aggregator; this is the
            // hard ceiling for a single request.
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Send a GET request to `url`
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        debug!("Fetching provider endpoint");
        let response = self.client.get(url).send().await?;

        info!(
            status = %response.status(),
            version = ?response.version(),
            "Response received"
        );

        Ok(response)
    }
}

#[async_trait]
impl FetchText for CatalogClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url).await?.error_for_status()?;
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(text)
    }
}
