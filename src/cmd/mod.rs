pub mod browse;
pub mod compose;
pub mod providers;

use std::sync::Arc;

use anyhow::Result;

use memeforge::{Aggregator, CatalogClient, Config};

/// Build the default aggregator from `config`.
pub fn default_aggregator(config: &Config) -> Result<Aggregator> {
    let client = Arc::new(CatalogClient::with_user_agent(&config.providers.user_agent)?);
    Ok(Aggregator::with_default_providers(client, config))
}
