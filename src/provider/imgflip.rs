//! Imgflip meme templates via the public `get_memes` API.
//!
//! Imgflip returns one fixed, un-paginated list of popular templates and has
//! no search endpoint, so queries are applied client-side.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use memeforge::provider::{ProviderAdapter, imgflip::ImgflipProvider};
//! use memeforge::CatalogClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = ImgflipProvider::new(Arc::new(CatalogClient::new()?));
//! let templates = provider.fetch_items(Some("drake")).await?;
//! for t in templates {
//!     println!("{} ({} boxes)", t.name, t.box_count);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{CatalogItem, ProviderAdapter, Source, DEFAULT_DIMENSION};
use crate::http_client::FetchText;

const IMGFLIP_ENDPOINT: &str = "https://api.imgflip.com/get_memes";

/// Imgflip template provider.
pub struct ImgflipProvider {
    client: Arc<dyn FetchText>,
    endpoint: String,
}

impl ImgflipProvider {
    pub fn new(client: Arc<dyn FetchText>) -> Self {
        Self {
            client,
            endpoint: IMGFLIP_ENDPOINT.to_string(),
        }
    }

    /// Point the provider at a different `get_memes` endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ProviderAdapter for ImgflipProvider {
    fn name(&self) -> &'static str {
        "imgflip"
    }

    fn source(&self) -> Source {
        Source::Imgflip
    }

    fn endpoint(&self, _query: Option<&str>) -> String {
        self.endpoint.clone()
    }

    async fn fetch_items(&self, query: Option<&str>) -> Result<Vec<CatalogItem>> {
        tracing::debug!("Fetching from Imgflip: {}", self.endpoint);

        let response = self
            .client
            .fetch_text(&self.endpoint)
            .await
            .context("Failed to fetch from Imgflip API")?;

        let parsed: ImgflipResponse =
            serde_json::from_str(&response).context("Failed to parse Imgflip response")?;

        if !parsed.success {
            anyhow::bail!(
                "Imgflip API reported failure: {}",
                parsed.error_message.as_deref().unwrap_or("no message")
            );
        }

        let items = parsed
            .data
            .map(|d| d.memes)
            .unwrap_or_default()
            .into_iter()
            .filter_map(normalize_meme);

        Ok(filter_by_name(items, query))
    }
}

fn normalize_meme(meme: ImgflipMeme) -> Option<CatalogItem> {
    if meme.url.is_empty() {
        tracing::debug!("Dropping Imgflip template {} without url", meme.id);
        return None;
    }

    Some(CatalogItem {
        id: meme.id,
        name: meme.name,
        url: meme.url,
        width: meme.width,
        height: meme.height,
        box_count: meme.box_count,
        source: Source::Imgflip,
        is_animated: false,
    })
}

/// Keep items whose name contains `query`, ignoring case.
fn filter_by_name(items: impl Iterator<Item = CatalogItem>, query: Option<&str>) -> Vec<CatalogItem> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    items.filter(|item| item.name_matches(&needle)).collect()
}

fn default_dimension() -> u32 {
    DEFAULT_DIMENSION
}

fn default_box_count() -> u32 {
    2
}

// ============================================================================
// Imgflip API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ImgflipResponse {
    success: bool,
    data: Option<ImgflipData>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImgflipData {
    #[serde(default)]
    memes: Vec<ImgflipMeme>,
}

#[derive(Debug, Deserialize)]
struct ImgflipMeme {
    id: String,
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default = "default_dimension", deserialize_with = "super::lenient_dimension")]
    width: u32,
    #[serde(default = "default_dimension", deserialize_with = "super::lenient_dimension")]
    height: u32,
    #[serde(default = "default_box_count")]
    box_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::testing::{FailingFetch, FakeFetch};

    const SAMPLE: &str = r#"{
        "success": true,
        "data": {
            "memes": [
                {"id": "181913649", "name": "Drake Hotline Bling", "url": "https://i.imgflip.com/30b1gx.jpg", "width": 1200, "height": 1200, "box_count": 2},
                {"id": "87743020", "name": "Two Buttons", "url": "https://i.imgflip.com/1g8my4.jpg", "width": 600, "height": 908, "box_count": 3},
                {"id": "5", "name": "Broken", "url": "", "width": 1, "height": 1, "box_count": 2},
                {"id": "112126428", "name": "Distracted Boyfriend", "url": "https://i.imgflip.com/1ur9b0.jpg", "width": "1200", "height": "800", "box_count": 3}
            ]
        }
    }"#;

    fn provider(fetch: FakeFetch) -> ImgflipProvider {
        ImgflipProvider::new(Arc::new(fetch))
    }

    #[tokio::test]
    async fn normalizes_templates_in_order() {
        let p = provider(FakeFetch::new().route(IMGFLIP_ENDPOINT, SAMPLE));
        let items = p.fetch_items(None).await.unwrap();

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Drake Hotline Bling", "Two Buttons", "Distracted Boyfriend"]);
        assert_eq!(items[0].id, "181913649");
        assert_eq!(items[1].box_count, 3);
        assert!(items.iter().all(|i| i.source == Source::Imgflip && !i.is_animated));
        assert_eq!((items[2].width, items[2].height), (1200, 800));
    }

    #[tokio::test]
    async fn filters_client_side_ignoring_case() {
        let fetch = FakeFetch::new().route(IMGFLIP_ENDPOINT, SAMPLE);
        let p = provider(fetch);
        let items = p.fetch_items(Some("  BUTTONS ")).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Two Buttons");
    }

    #[tokio::test]
    async fn query_never_reaches_the_url() {
        let fetch = Arc::new(FakeFetch::new().route(IMGFLIP_ENDPOINT, SAMPLE));
        let p = ImgflipProvider::new(fetch.clone());
        p.fetch_items(Some("drake")).await.unwrap();

        assert_eq!(fetch.requested(), vec![IMGFLIP_ENDPOINT.to_string()]);
    }

    #[tokio::test]
    async fn unsuccessful_response_is_an_error() {
        let body = r#"{"success": false, "error_message": "rate limited"}"#;
        let p = provider(FakeFetch::new().route(IMGFLIP_ENDPOINT, body));
        let err = p.fetch_items(None).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn network_failure_is_an_error() {
        let p = ImgflipProvider::new(Arc::new(FailingFetch));
        assert!(p.fetch_items(None).await.is_err());
    }

    #[tokio::test]
    async fn custom_endpoint_is_used() {
        let fetch = Arc::new(FakeFetch::new().route("http://localhost:9/memes", SAMPLE));
        let p = ImgflipProvider::new(fetch.clone()).with_endpoint("http://localhost:9/memes");
        assert_eq!(p.fetch_items(None).await.unwrap().len(), 3);
        assert_eq!(p.endpoint(Some("x")), "http://localhost:9/memes");
    }
}
