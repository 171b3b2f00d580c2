//! Concurrent fan-out over every provider.
//!
//! Each adapter runs as its own task under a deadline; the results are joined
//! once all of them settle and concatenated in registration order
//! (Imgflip, Tenor, Giphy). Total latency is bounded by the slowest provider.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::AggregateError;
use crate::http_client::FetchText;
use crate::provider::giphy::GiphyProvider;
use crate::provider::imgflip::ImgflipProvider;
use crate::provider::tenor::TenorProvider;
use crate::provider::{fetch_or_empty, normalize_query, CatalogItem, ProviderAdapter};

/// Default per-provider deadline.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);

/// Merged result of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub items: Vec<CatalogItem>,
}

/// Queries every registered provider concurrently and merges the results.
pub struct Aggregator {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    timeout: Duration,
}

impl Aggregator {
    /// Create an aggregator over `providers`, merged in the given order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Imgflip, Tenor and Giphy over a shared client, configured from `config`.
    #[must_use]
    pub fn with_default_providers(client: Arc<dyn FetchText>, config: &Config) -> Self {
        let providers: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(ImgflipProvider::new(client.clone())),
            Arc::new(
                TenorProvider::new(client.clone(), config.tenor_api_key())
                    .with_limit(config.providers.limit),
            ),
            Arc::new(
                GiphyProvider::new(client, config.giphy_api_key())
                    .with_limit(config.providers.limit),
            ),
        ];

        Self::new(providers).with_timeout(config.provider_timeout())
    }

    /// Set the per-provider deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registered providers, in merge order.
    pub fn providers(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.providers
    }

    /// Fetch from every provider at once and concatenate in provider order.
    ///
    /// A provider that fails, panics or times out contributes nothing. The
    /// only error is a provider task that was cancelled.
    #[instrument(skip(self), fields(providers = self.providers.len()))]
    pub async fn fetch_all(&self, query: Option<&str>) -> Result<CatalogResponse, AggregateError> {
        let query = normalize_query(query).map(str::to_string);

        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let query = query.clone();
                let timeout = self.timeout;
                tokio::spawn(async move {
                    fetch_or_empty(provider.as_ref(), query.as_deref(), timeout).await
                })
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let mut items = Vec::new();
        for (provider, result) in self.providers.iter().zip(results) {
            let batch = settle(provider.name(), result)?;
            debug!("Merging {} items from {}", batch.len(), provider.name());
            items.extend(batch);
        }

        info!(total = items.len(), query = ?query, "Catalog aggregated");

        Ok(CatalogResponse {
            success: true,
            items,
        })
    }

    /// Search all providers; a blank query fetches the default listings.
    pub async fn search(&self, query: &str) -> Result<CatalogResponse, AggregateError> {
        self.fetch_all(normalize_query(Some(query))).await
    }
}

/// Resolve one provider task.
///
/// A panicking adapter counts as a failed provider and contributes nothing.
/// A cancelled task means the runtime is going away, which faults the fan-out.
fn settle(
    provider: &'static str,
    result: Result<Vec<CatalogItem>, JoinError>,
) -> Result<Vec<CatalogItem>, AggregateError> {
    match result {
        Ok(batch) => Ok(batch),
        Err(e) if e.is_panic() => {
            warn!("Provider {provider} panicked: {e}");
            Ok(Vec::new())
        }
        Err(source) => Err(AggregateError::Join { provider, source }),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted providers for aggregator and session tests.

    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::provider::{prefixed_id, CatalogItem, ProviderAdapter, Source};

    /// What a [`ScriptedProvider`] does when called.
    #[derive(Clone)]
    pub enum Script {
        Items(Vec<&'static str>),
        Fail,
        Panic,
        Delay(Duration, Vec<&'static str>),
    }

    pub struct ScriptedProvider {
        pub source: Source,
        pub script: Script,
        pub queries: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedProvider {
        pub fn new(source: Source, script: Script) -> Self {
            Self {
                source,
                script,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    /// Error of a task aborted before it finished.
    pub async fn cancelled() -> tokio::task::JoinError {
        let handle = tokio::spawn(std::future::pending::<Vec<CatalogItem>>());
        handle.abort();
        match handle.await {
            Err(e) => e,
            Ok(_) => unreachable!("pending task cannot complete"),
        }
    }

    pub fn item(source: Source, raw_id: &str, name: &str) -> CatalogItem {
        let id = match source {
            Source::Imgflip => raw_id.to_string(),
            other => prefixed_id(other, raw_id),
        };
        CatalogItem {
            id,
            name: name.to_string(),
            url: format!("https://{source}.test/{raw_id}.gif"),
            width: 500,
            height: 500,
            box_count: 2,
            source,
            is_animated: source != Source::Imgflip,
        }
    }

    fn items(source: Source, names: &[&str]) -> Vec<CatalogItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| item(source, &(i + 1).to_string(), name))
            .collect()
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedProvider {
        fn name(&self) -> &'static str {
            self.source.as_str()
        }

        fn source(&self) -> Source {
            self.source
        }

        fn endpoint(&self, _query: Option<&str>) -> String {
            format!("https://{}.test/", self.source)
        }

        async fn fetch_items(&self, query: Option<&str>) -> Result<Vec<CatalogItem>> {
            if let Ok(mut q) = self.queries.lock() {
                q.push(query.map(str::to_string));
            }
            match &self.script {
                Script::Items(names) => Ok(items(self.source, names)),
                Script::Fail => anyhow::bail!("simulated network error"),
                Script::Panic => panic!("provider blew up"),
                Script::Delay(delay, names) => {
                    tokio::time::sleep(*delay).await;
                    Ok(items(self.source, names))
                }
            }
        }
    }
}
