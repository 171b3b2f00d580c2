//! Giphy GIFs via the Giphy v1 API.
//!
//! Uses `trending` when there is no query and `search` otherwise. Giphy
//! reports image dimensions as strings, so they go through the lenient
//! dimension parser.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{
    normalize_query, prefixed_id, CatalogItem, ProviderAdapter, Source, DEFAULT_BOX_COUNT,
    DEFAULT_DIMENSION, DEFAULT_LIMIT,
};
use crate::http_client::FetchText;

const GIPHY_API_BASE: &str = "https://api.giphy.com/v1/gifs";

/// Public beta key, used when no key is configured.
pub const GIPHY_DEMO_KEY: &str = "dc6zaTOxFJmzC";

/// Giphy GIF provider.
pub struct GiphyProvider {
    client: Arc<dyn FetchText>,
    api_key: String,
    api_base: String,
    limit: u32,
}

impl GiphyProvider {
    /// Create a provider; `None` falls back to [`GIPHY_DEMO_KEY`].
    pub fn new(client: Arc<dyn FetchText>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| GIPHY_DEMO_KEY.to_string()),
            api_base: GIPHY_API_BASE.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl ProviderAdapter for GiphyProvider {
    fn name(&self) -> &'static str {
        "giphy"
    }

    fn source(&self) -> Source {
        Source::Giphy
    }

    fn endpoint(&self, query: Option<&str>) -> String {
        let key = urlencoding::encode(&self.api_key);
        match normalize_query(query) {
            Some(q) => format!(
                "{}/search?api_key={key}&q={}&limit={}",
                self.api_base,
                urlencoding::encode(q),
                self.limit
            ),
            None => format!("{}/trending?api_key={key}&limit={}", self.api_base, self.limit),
        }
    }

    async fn fetch_items(&self, query: Option<&str>) -> Result<Vec<CatalogItem>> {
        let api_url = self.endpoint(query);
        tracing::debug!("Fetching from Giphy: {}", api_url);

        let response = self
            .client
            .fetch_text(&api_url)
            .await
            .context("Failed to fetch from Giphy API")?;

        let parsed: GiphyResponse =
            serde_json::from_str(&response).context("Failed to parse Giphy response")?;

        Ok(parsed.data.into_iter().filter_map(normalize_gif).collect())
    }
}

fn normalize_gif(gif: GiphyGif) -> Option<CatalogItem> {
    let images = gif.images;
    let Some(image) = images
        .original
        .filter(|i| !i.url.is_empty())
        .or(images.fixed_height)
        .filter(|i| !i.url.is_empty())
    else {
        tracing::debug!("Dropping Giphy gif {} without image url", gif.id);
        return None;
    };

    let name = match gif.title.trim() {
        "" => "Giphy GIF".to_string(),
        title => title.to_string(),
    };

    Some(CatalogItem {
        id: prefixed_id(Source::Giphy, &gif.id),
        name,
        url: image.url,
        width: image.width,
        height: image.height,
        box_count: DEFAULT_BOX_COUNT,
        source: Source::Giphy,
        is_animated: true,
    })
}

fn default_dimension() -> u32 {
    DEFAULT_DIMENSION
}

// ============================================================================
// Giphy API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    #[serde(default)]
    data: Vec<GiphyGif>,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    images: GiphyImages,
}

#[derive(Debug, Default, Deserialize)]
struct GiphyImages {
    original: Option<GiphyImage>,
    fixed_height: Option<GiphyImage>,
}

#[derive(Debug, Deserialize)]
struct GiphyImage {
    #[serde(default)]
    url: String,
    #[serde(default = "default_dimension", deserialize_with = "super::lenient_dimension")]
    width: u32,
    #[serde(default = "default_dimension", deserialize_with = "super::lenient_dimension")]
    height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::testing::FakeFetch;

    const SAMPLE: &str = r#"{
        "data": [
            {
                "id": "5",
                "title": "Funny Cat GIF",
                "images": {
                    "original": {"url": "https://media.giphy.com/media/5/giphy.gif", "width": "480", "height": "270"},
                    "fixed_height": {"url": "https://media.giphy.com/media/5/200.gif", "width": "356", "height": "200"}
                }
            },
            {
                "id": "abc",
                "title": "   ",
                "images": {
                    "original": {"url": "", "width": "480", "height": "270"},
                    "fixed_height": {"url": "https://media.giphy.com/media/abc/200.gif", "width": "n/a"}
                }
            },
            {
                "id": "gone",
                "title": "Deleted",
                "images": {}
            }
        ],
        "pagination": {"total_count": 3, "count": 3, "offset": 0},
        "meta": {"status": 200, "msg": "OK"}
    }"#;

    fn provider() -> (Arc<FakeFetch>, GiphyProvider) {
        let fetch = Arc::new(FakeFetch::new().route(GIPHY_API_BASE, SAMPLE));
        let provider = GiphyProvider::new(fetch.clone(), None);
        (fetch, provider)
    }

    #[tokio::test]
    async fn parses_string_dimensions() {
        let (_, p) = provider();
        let items = p.fetch_items(None).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "giphy-5");
        assert_eq!(items[0].name, "Funny Cat GIF");
        assert_eq!((items[0].width, items[0].height), (480, 270));
        assert!(items.iter().all(|i| i.is_animated && i.source == Source::Giphy));
    }

    #[tokio::test]
    async fn falls_back_to_fixed_height_with_default_dimensions() {
        let (_, p) = provider();
        let items = p.fetch_items(None).await.unwrap();

        assert_eq!(items[1].url, "https://media.giphy.com/media/abc/200.gif");
        assert_eq!(items[1].name, "Giphy GIF");
        assert_eq!((items[1].width, items[1].height), (500, 500));
    }

    #[tokio::test]
    async fn endpoints_follow_query_presence() {
        let (fetch, p) = provider();
        p.fetch_items(None).await.unwrap();
        p.fetch_items(Some("rick roll")).await.unwrap();

        let requested = fetch.requested();
        assert_eq!(
            requested[0],
            "https://api.giphy.com/v1/gifs/trending?api_key=dc6zaTOxFJmzC&limit=50"
        );
        assert_eq!(
            requested[1],
            "https://api.giphy.com/v1/gifs/search?api_key=dc6zaTOxFJmzC&q=rick%20roll&limit=50"
        );
    }

    #[tokio::test]
    async fn empty_payload_yields_no_items() {
        let fetch = Arc::new(FakeFetch::new().route(GIPHY_API_BASE, r#"{"data": []}"#));
        let p = GiphyProvider::new(fetch, Some("k".into()));
        assert!(p.fetch_items(None).await.unwrap().is_empty());
    }
}
