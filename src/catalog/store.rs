//! Catalog state: the last fetched set, the live query, and the filtered view
//! derived from both.
//!
//! Every mutator recomputes the filtered set before returning, so a reader
//! can never see `full_set`/`query` out of step with `filtered_set`. The
//! store is a plain owned value; a multi-threaded host wraps it in a single
//! `Mutex` so each mutation stays one critical section.

use crate::provider::CatalogItem;

/// Identifies one outstanding fetch. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub struct CatalogStore {
    /// `None` until the first fetch completes.
    full_set: Option<Vec<CatalogItem>>,
    /// As typed; casing preserved for display.
    query: String,
    filtered_set: Vec<CatalogItem>,
    loading: bool,
    last_error: Option<String>,
    latest_issued: u64,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live query and refilter the current set.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    /// Replace the fetched set and refilter with the current query.
    pub fn set_full_set(&mut self, items: Option<Vec<CatalogItem>>) {
        self.full_set = items;
        self.recompute();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query as used for matching: trimmed and lowercased.
    pub fn match_key(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// `true` when the query has something other than whitespace.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn full_set(&self) -> Option<&[CatalogItem]> {
        self.full_set.as_deref()
    }

    pub fn filtered_set(&self) -> &[CatalogItem] {
        &self.filtered_set
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Mark a fetch as started and hand out its ticket.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.latest_issued += 1;
        self.loading = true;
        RequestTicket(self.latest_issued)
    }

    /// Apply a completed fetch unless a newer one has been issued since.
    ///
    /// Returns `false` when the response was stale and discarded.
    pub fn apply_response(&mut self, ticket: RequestTicket, items: Vec<CatalogItem>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale catalog response {} (latest {})",
                ticket.0,
                self.latest_issued
            );
            return false;
        }

        self.loading = false;
        self.last_error = None;
        self.set_full_set(Some(items));
        true
    }

    /// Record a failed fetch. The previous set is kept untouched.
    pub fn fail_request(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.loading = false;
        self.last_error = Some(message.into());
        true
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest_issued
    }

    fn recompute(&mut self) {
        let needle = self.match_key();
        self.filtered_set = self
            .full_set
            .iter()
            .flatten()
            .filter(|item| item.name_matches(&needle))
            .cloned()
            .collect();
    }
}
