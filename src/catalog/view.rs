//! Paginated, source-filtered presentation of the catalog store.
//!
//! The view owns only its own UI state (source tab, current page). Items are
//! always read from the [`CatalogStore`] passed in, never cached.

use std::fmt;

use serde::Serialize;

use super::selection::{SelectedTemplate, SelectionHolder};
use super::store::CatalogStore;
use crate::provider::{CatalogItem, Source};

/// Items per page.
pub const PAGE_SIZE: usize = 25;

/// Skeleton slots shown while a fetch is outstanding.
pub const PLACEHOLDER_COUNT: usize = 10;

/// Source tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    Only(Source),
}

impl SourceFilter {
    /// Tabs in display order.
    pub const TABS: [SourceFilter; 4] = [
        SourceFilter::All,
        SourceFilter::Only(Source::Imgflip),
        SourceFilter::Only(Source::Tenor),
        SourceFilter::Only(Source::Giphy),
    ];

    #[must_use]
    pub fn admits(self, item: &CatalogItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(source) => item.source == source,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(Source::Imgflip) => "Imgflip",
            Self::Only(Source::Tenor) => "Tenor",
            Self::Only(Source::Giphy) => "Giphy",
        }
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the UI should go after an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Editor,
}

/// What the catalog area should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Loading {
        placeholders: usize,
    },
    /// The last fetch faulted; offer a retry.
    Failed {
        message: String,
    },
    NoResults {
        query: String,
    },
    Grid {
        items: Vec<CatalogItem>,
        page: usize,
        total_pages: usize,
        has_previous: bool,
        has_next: bool,
    },
}

#[derive(Debug)]
pub struct CatalogView {
    source_filter: SourceFilter,
    current_page: usize,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            source_filter: SourceFilter::All,
            current_page: 1,
        }
    }
}

impl CatalogView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_filter(&self) -> SourceFilter {
        self.source_filter
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Change the search query. A different query resets to page 1.
    pub fn set_query(&mut self, store: &mut CatalogStore, query: impl Into<String>) {
        let query = query.into();
        if query != store.query() {
            self.current_page = 1;
        }
        store.set_query(query);
    }

    /// The "clear search" action.
    pub fn clear_search(&mut self, store: &mut CatalogStore) {
        self.set_query(store, String::new());
    }

    /// Change the source tab. A different tab resets to page 1.
    pub fn set_source_filter(&mut self, filter: SourceFilter) {
        if filter != self.source_filter {
            self.source_filter = filter;
            self.current_page = 1;
        }
    }

    /// Filtered items admitted by the source tab, in catalog order.
    pub fn visible_items<'a>(&self, store: &'a CatalogStore) -> Vec<&'a CatalogItem> {
        store
            .filtered_set()
            .iter()
            .filter(|item| self.source_filter.admits(item))
            .collect()
    }

    pub fn total_pages(&self, store: &CatalogStore) -> usize {
        total_pages(self.visible_items(store).len())
    }

    /// Page actually shown: the current page, pulled back onto the last page
    /// when the set has shrunk under it. The stored page is left alone.
    pub fn shown_page(&self, store: &CatalogStore) -> usize {
        self.current_page.clamp(1, self.total_pages(store).max(1))
    }

    /// Items on the shown page.
    pub fn page_items<'a>(&self, store: &'a CatalogStore) -> Vec<&'a CatalogItem> {
        let page = self.shown_page(store);
        self.visible_items(store)
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn next_page(&mut self, store: &CatalogStore) {
        self.go_to_page(store, self.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self, store: &CatalogStore) {
        self.go_to_page(store, self.current_page.saturating_sub(1));
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, store: &CatalogStore, page: usize) {
        let last = self.total_pages(store).max(1);
        self.current_page = page.clamp(1, last);
    }

    /// Active query for the "results for" header, if any.
    pub fn search_header<'a>(&self, store: &'a CatalogStore) -> Option<&'a str> {
        store.has_query().then(|| store.query())
    }

    pub fn render(&self, store: &CatalogStore) -> ViewState {
        if store.is_loading() {
            return ViewState::Loading {
                placeholders: PLACEHOLDER_COUNT,
            };
        }

        if let Some(message) = store.last_error() {
            return ViewState::Failed {
                message: message.to_string(),
            };
        }

        let visible = self.visible_items(store);
        if store.has_query() && visible.is_empty() {
            return ViewState::NoResults {
                query: store.query().to_string(),
            };
        }

        let total = total_pages(visible.len());
        let page = self.shown_page(store);
        ViewState::Grid {
            items: self.page_items(store).into_iter().cloned().collect(),
            page,
            total_pages: total,
            has_previous: page > 1,
            has_next: page < total,
        }
    }

    /// Commit `item` as the editor's template and route to the editor.
    ///
    /// The commit lands before the navigation is returned, so the editor's
    /// first read sees it.
    pub fn select(&self, item: &CatalogItem, selection: &mut SelectionHolder) -> Navigation {
        selection.commit(SelectedTemplate::from(item));
        Navigation::Editor
    }
}

/// `ceil(count / PAGE_SIZE)`.
#[must_use]
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}
