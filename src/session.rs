//! Application session: the state container shared by the catalog screens
//! and the editor.
//!
//! Owns the catalog store, the catalog view, the selection hand-off and the
//! aggregator. Nothing here is global; hosts create one `Session` per run
//! and pass it to whatever needs it.

use std::sync::Arc;

use tracing::warn;

use crate::aggregator::{Aggregator, CatalogResponse};
use crate::catalog::{
    CatalogStore, CatalogView, Navigation, RequestTicket, SelectionHolder, SourceFilter,
    ViewState,
};
use crate::error::AggregateError;
use crate::overlay::OverlayEngine;

pub struct Session {
    aggregator: Arc<Aggregator>,
    store: CatalogStore,
    view: CatalogView,
    selection: SelectionHolder,
}

impl Session {
    #[must_use]
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            aggregator,
            store: CatalogStore::new(),
            view: CatalogView::new(),
            selection: SelectionHolder::new(),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Update the search box. Call [`Session::refresh`] afterwards to refetch.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.view.set_query(&mut self.store, query);
    }

    pub fn clear_search(&mut self) {
        self.view.clear_search(&mut self.store);
    }

    pub fn set_source_filter(&mut self, filter: SourceFilter) {
        self.view.set_source_filter(filter);
    }

    pub fn next_page(&mut self) {
        self.view.next_page(&self.store);
    }

    pub fn previous_page(&mut self) {
        self.view.previous_page(&self.store);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.view.go_to_page(&self.store, page);
    }

    /// Start a fetch for the current query.
    ///
    /// Returns the ticket and the query to fetch with. Hosts that run the
    /// fetch elsewhere hand the outcome back through [`Session::complete`].
    pub fn begin_refresh(&mut self) -> (RequestTicket, Option<String>) {
        let ticket = self.store.begin_request();
        let query = self
            .store
            .has_query()
            .then(|| self.store.query().trim().to_string());
        (ticket, query)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` if a newer fetch has started since and this one was dropped.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<CatalogResponse, AggregateError>,
    ) -> bool {
        match outcome {
            Ok(response) => self.store.apply_response(ticket, response.items),
            Err(e) => {
                warn!("Catalog fetch failed: {e}");
                self.store.fail_request(ticket, e.to_string())
            }
        }
    }

    /// Fetch the catalog for the current query and apply it.
    pub async fn refresh(&mut self) -> bool {
        let (ticket, query) = self.begin_refresh();
        let aggregator = Arc::clone(&self.aggregator);
        let outcome = aggregator.fetch_all(query.as_deref()).await;
        self.complete(ticket, outcome)
    }

    pub fn render(&self) -> ViewState {
        self.view.render(&self.store)
    }

    /// Pick the item at `index` on the current page for editing.
    pub fn select(&mut self, index: usize) -> Option<Navigation> {
        let item = self.view.page_items(&self.store).get(index).copied()?;
        Some(self.view.select(item, &mut self.selection))
    }

    /// Open the editor on the pending selection, consuming it.
    pub fn open_editor(&mut self) -> Option<OverlayEngine> {
        self.selection.take().map(OverlayEngine::from_selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::testing::{cancelled, Script, ScriptedProvider};
    use crate::overlay::{BaseImage, CaptionSlot};
    use crate::provider::{ProviderAdapter, Source};

    fn session(scripts: [Script; 3]) -> Session {
        let providers: Vec<Arc<dyn ProviderAdapter>> = Source::ALL
            .into_iter()
            .zip(scripts)
            .map(|(source, script)| Arc::new(ScriptedProvider::new(source, script)) as Arc<dyn ProviderAdapter>)
            .collect();
        Session::new(Arc::new(Aggregator::new(providers)))
    }

    #[tokio::test]
    async fn refresh_fills_the_grid() {
        let mut s = session([
            Script::Items(vec!["Cat Meme", "Dog Meme"]),
            Script::Items(vec!["Funny Cat"]),
            Script::Fail,
        ]);

        assert!(s.refresh().await);
        match s.render() {
            ViewState::Grid { items, total_pages, .. } => {
                assert_eq!(items.len(), 3);
                assert_eq!(total_pages, 1);
            }
            other => panic!("expected grid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn query_filters_locally_until_refetched() {
        let mut s = session([
            Script::Items(vec!["Cat Meme", "Dog Meme", "Funny Cat"]),
            Script::Items(vec![]),
            Script::Items(vec![]),
        ]);
        s.refresh().await;
        s.set_query("cat");

        let names: Vec<_> = s.store().filtered_set().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, ["Cat Meme", "Funny Cat"]);
    }

    #[tokio::test]
    async fn panicking_provider_keeps_sibling_items() {
        let mut s = session([
            Script::Items(vec!["Cat Meme"]),
            Script::Panic,
            Script::Items(vec!["Funny Cat"]),
        ]);
        assert!(s.refresh().await);
        match s.render() {
            ViewState::Grid { items, .. } => {
                let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
                assert_eq!(names, ["Cat Meme", "Funny Cat"]);
            }
            other => panic!("expected grid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn aggregation_fault_shows_retryable_error() {
        let mut s = session([Script::Items(vec![]), Script::Items(vec![]), Script::Items(vec![])]);
        let (ticket, _) = s.begin_refresh();
        let fault = AggregateError::Join {
            provider: "tenor",
            source: cancelled().await,
        };

        assert!(s.complete(ticket, Err(fault)));
        assert!(matches!(s.render(), ViewState::Failed { .. }));
        assert!(s.store().full_set().is_none());
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let mut s = session([
            Script::Items(vec!["old"]),
            Script::Items(vec![]),
            Script::Items(vec![]),
        ]);

        let (stale, _) = s.begin_refresh();
        let (fresh, _) = s.begin_refresh();
        let response = s.aggregator().fetch_all(None).await;

        assert!(s.complete(fresh, response));
        let outdated = CatalogResponse {
            success: true,
            items: vec![],
        };
        assert!(!s.complete(stale, Ok(outdated)));
        assert_eq!(s.store().filtered_set().len(), 1);
    }

    #[test]
    fn begin_refresh_trims_query() {
        let mut s = session([Script::Fail, Script::Fail, Script::Fail]);
        s.set_query("  Cat ");
        assert_eq!(s.begin_refresh().1.as_deref(), Some("Cat"));
        s.set_query("   ");
        assert_eq!(s.begin_refresh().1, None);
    }

    #[tokio::test]
    async fn selection_reaches_editor_once() {
        let mut s = session([
            Script::Items(vec!["Drake"]),
            Script::Items(vec![]),
            Script::Items(vec![]),
        ]);
        s.refresh().await;

        assert_eq!(s.select(0), Some(Navigation::Editor));
        assert_eq!(s.select(5), None);

        let engine = s.open_editor().unwrap();
        assert_eq!(engine.title(), Some("Drake"));
        assert_eq!(engine.base_image(), &BaseImage::Url("https://imgflip.test/1.gif".into()));
        assert!(!engine.caption(CaptionSlot::Top).is_visible());
        assert!(s.open_editor().is_none());
    }
}
