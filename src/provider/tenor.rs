//! Tenor GIFs via the Tenor v2 API.
//!
//! Uses `featured` when there is no query and `search` otherwise. Tenor
//! nests media under `media_formats`; the full `gif` rendition is preferred
//! and `tinygif` is the fallback.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{
    normalize_query, prefixed_id, CatalogItem, ProviderAdapter, Source, DEFAULT_BOX_COUNT,
    DEFAULT_DIMENSION, DEFAULT_LIMIT,
};
use crate::http_client::FetchText;

const TENOR_API_BASE: &str = "https://tenor.googleapis.com/v2";

/// Public demo key, used when no key is configured.
pub const TENOR_DEMO_KEY: &str = "LIVDSRZULELA";

/// Tenor GIF provider.
pub struct TenorProvider {
    client: Arc<dyn FetchText>,
    api_key: String,
    api_base: String,
    limit: u32,
}

impl TenorProvider {
    /// Create a provider; `None` falls back to [`TENOR_DEMO_KEY`].
    pub fn new(client: Arc<dyn FetchText>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| TENOR_DEMO_KEY.to_string()),
            api_base: TENOR_API_BASE.to_string(),
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
impl ProviderAdapter for TenorProvider {
    fn name(&self) -> &'static str {
        "tenor"
    }

    fn source(&self) -> Source {
        Source::Tenor
    }

    fn endpoint(&self, query: Option<&str>) -> String {
        match normalize_query(query) {
            Some(q) => format!(
                "{}/search?q={}&key={}&limit={}",
                self.api_base,
                urlencoding::encode(q),
                urlencoding::encode(&self.api_key),
                self.limit
            ),
            None => format!(
                "{}/featured?key={}&limit={}",
                self.api_base,
                urlencoding::encode(&self.api_key),
                self.limit
            ),
        }
    }

    async fn fetch_items(&self, query: Option<&str>) -> Result<Vec<CatalogItem>> {
        let api_url = self.endpoint(query);
        tracing::debug!("Fetching from Tenor: {}", api_url);

        let response = self
            .client
            .fetch_text(&api_url)
            .await
            .context("Failed to fetch from Tenor API")?;

        let parsed: TenorResponse =
            serde_json::from_str(&response).context("Failed to parse Tenor response")?;

        Ok(parsed.results.into_iter().filter_map(normalize_result).collect())
    }
}

fn normalize_result(result: TenorResult) -> Option<CatalogItem> {
    let formats = result.media_formats;
    let media = formats
        .gif
        .filter(|m| !m.url.is_empty())
        .or(formats.tinygif)
        .filter(|m| !m.url.is_empty());

    let Some(media) = media else {
        tracing::debug!("Dropping Tenor result {} without media url", result.id);
        return None;
    };

    let (width, height) = media.dimensions();
    let name = [result.content_description, result.title]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "Tenor GIF".to_string());

    Some(CatalogItem {
        id: prefixed_id(Source::Tenor, &result.id),
        name,
        url: media.url,
        width,
        height,
        box_count: DEFAULT_BOX_COUNT,
        source: Source::Tenor,
        is_animated: true,
    })
}

// ============================================================================
// Tenor API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TenorResponse {
    #[serde(default)]
    results: Vec<TenorResult>,
}

#[derive(Debug, Deserialize)]
struct TenorResult {
    id: String,
    title: Option<String>,
    content_description: Option<String>,
    #[serde(default)]
    media_formats: TenorFormats,
}

#[derive(Debug, Default, Deserialize)]
struct TenorFormats {
    gif: Option<TenorMedia>,
    tinygif: Option<TenorMedia>,
}

#[derive(Debug, Deserialize)]
struct TenorMedia {
    #[serde(default)]
    url: String,
    #[serde(default)]
    dims: Vec<serde_json::Value>,
}

impl TenorMedia {
    fn dimensions(&self) -> (u32, u32) {
        let dim = |idx: usize| {
            self.dims
                .get(idx)
                .and_then(|v| match v {
                    serde_json::Value::Number(n) => n.as_u64(),
                    serde_json::Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                })
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_DIMENSION)
        };
        (dim(0), dim(1))
    }
}
