//! `memeforge` - meme template catalog and caption editor
//!
//! # Features
//!
//! - **Aggregation**: Imgflip templates plus Tenor and Giphy GIFs, fetched
//!   concurrently and merged into one uniform catalog
//! - **Fail-soft providers**: a provider that errors or times out contributes
//!   nothing instead of failing the whole fetch
//! - **Catalog state**: live query filtering, source tabs, pagination
//! - **Overlay editor**: two independently styled captions, dragged into place
//!   and stored as container percentages
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use memeforge::{Aggregator, CatalogClient, Config, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let client = Arc::new(CatalogClient::with_user_agent(&config.providers.user_agent)?);
//!     let aggregator = Aggregator::with_default_providers(client, &config);
//!
//!     let mut session = Session::new(Arc::new(aggregator));
//!     session.set_query("cat");
//!     session.refresh().await;
//!     println!("{:?}", session.render());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http_client;
pub mod overlay;
pub mod provider;
pub mod session;

pub use aggregator::{Aggregator, CatalogResponse};
pub use catalog::{CatalogStore, CatalogView, SelectedTemplate, SelectionHolder, SourceFilter, ViewState};
pub use config::Config;
pub use error::{AggregateError, ConfigError};
pub use http_client::{CatalogClient, FetchText};
pub use overlay::{BaseImage, CaptionSlot, CaptionStyle, DragHandler, OverlayEngine, Rect};
pub use provider::{CatalogItem, ProviderAdapter, Source};
pub use session::Session;

/// Version of memeforge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
