//! Catalog providers.
//!
//! Each provider turns one third-party API into a list of [`CatalogItem`]s.
//! Imgflip serves a fixed list of static templates; Tenor and Giphy serve
//! animated GIFs with trending and search endpoints.
//!
//! # Architecture
//!
//! - [`ProviderAdapter`]: Async trait for provider-specific fetching
//! - [`fetch_or_empty`]: Fail-soft wrapper, turns errors and timeouts into an empty list
//! - [`CatalogItem`]: The uniform item shape every adapter produces
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use memeforge::provider::{fetch_or_empty, imgflip::ImgflipProvider};
//! use memeforge::CatalogClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Arc::new(CatalogClient::new()?);
//! let provider = ImgflipProvider::new(client);
//!
//! let items = fetch_or_empty(&provider, Some("drake"), Duration::from_secs(8)).await;
//! println!("{} templates", items.len());
//! # Ok(())
//! # }
//! ```

pub mod giphy;
pub mod imgflip;
pub mod tenor;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback edge length when a provider omits or garbles a dimension.
pub const DEFAULT_DIMENSION: u32 = 500;

/// Suggested caption slots for animated items, which are not real templates.
pub const DEFAULT_BOX_COUNT: u32 = 2;

/// Number of results requested from paginated providers.
pub const DEFAULT_LIMIT: u32 = 50;

/// Which provider an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Imgflip,
    Tenor,
    Giphy,
}

impl Source {
    /// All sources in merge order.
    pub const ALL: [Source; 3] = [Source::Imgflip, Source::Tenor, Source::Giphy];

    /// Lowercase tag, also used as the id prefix for non-primary providers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Imgflip => "imgflip",
            Self::Tenor => "tenor",
            Self::Giphy => "giphy",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "imgflip" => Ok(Self::Imgflip),
            "tenor" => Ok(Self::Tenor),
            "giphy" => Ok(Self::Giphy),
            other => anyhow::bail!("unknown source: {other}"),
        }
    }
}

/// A single browsable template or animated image.
///
/// Immutable once an adapter has produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Globally unique. Tenor and Giphy ids are prefixed with their source tag.
    pub id: String,
    pub name: String,
    /// Media address.
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Suggested number of caption slots.
    pub box_count: u32,
    pub source: Source,
    pub is_animated: bool,
}

impl CatalogItem {
    /// Case-insensitive substring match of `needle` against the item name.
    ///
    /// `needle` must already be lowercased and trimmed; an empty needle matches.
    #[must_use]
    pub fn name_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

/// Build a provider-unique id: `"<source>-<provider id>"`.
#[must_use]
pub fn prefixed_id(source: Source, raw_id: &str) -> String {
    format!("{}-{raw_id}", source.as_str())
}

/// Trim a user query, returning `None` when nothing is left.
#[must_use]
pub fn normalize_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

/// A catalog provider.
///
/// Implementors fetch from one third-party API and normalize the response
/// into [`CatalogItem`]s. Errors are returned, not swallowed; callers go
/// through [`fetch_or_empty`] to get the fail-soft behaviour.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short lowercase provider name (e.g., `"imgflip"`, `"tenor"`).
    fn name(&self) -> &'static str;

    /// Source tag stamped on every produced item.
    fn source(&self) -> Source;

    /// Endpoint that would be requested for `query`, for diagnostics.
    fn endpoint(&self, query: Option<&str>) -> String;

    /// Fetch and normalize items, optionally narrowed by `query`.
    async fn fetch_items(&self, query: Option<&str>) -> Result<Vec<CatalogItem>>;
}

/// Run `adapter` with a deadline, turning any failure into an empty list.
///
/// This is the adapter contract seen by the aggregator: it never fails, so
/// one broken provider cannot take its siblings down with it.
pub async fn fetch_or_empty(
    adapter: &dyn ProviderAdapter,
    query: Option<&str>,
    timeout: Duration,
) -> Vec<CatalogItem> {
    let query = normalize_query(query);
    match tokio::time::timeout(timeout, adapter.fetch_items(query)).await {
        Ok(Ok(items)) => {
            tracing::debug!("Provider {} returned {} items", adapter.name(), items.len());
            items
        }
        Ok(Err(e)) => {
            tracing::warn!("Provider {} failed: {:#}", adapter.name(), e);
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                "Provider {} timed out after {:?}",
                adapter.name(),
                timeout
            );
            Vec::new()
        }
    }
}

/// Parse a dimension that may arrive as a number, a numeric string, or not at all.
pub(crate) fn lenient_dimension<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(DEFAULT_DIMENSION, dimension_from_value))
}

fn dimension_from_value(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_DIMENSION),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(DEFAULT_DIMENSION),
        _ => DEFAULT_DIMENSION,
    }
}
