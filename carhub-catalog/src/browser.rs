//! Cursor-paginated catalog view.
//!
//! Two modes share one [`PageState`]: browsing everything and searching by
//! name prefix. Both are newest first and forward-only.
//!
//! Every fetch captures the state's `generation` when it is issued and is
//! applied only if the generation is unchanged when it completes. Starting
//! a new mode (or tearing the view down) bumps the generation, so a late
//! response for an older mode is dropped instead of overwriting the list.
//!
//! Locks are never held across a collection call; all state changes happen
//! in short critical sections before and after the `.await`.

use std::sync::Arc;

use carhub_core::{Cursor, Listing, ListingCollection, ListingId, ListingSummary, QueryMode};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::images::ImageReadinessTracker;

/// Snapshot of a browser's list state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub items: Vec<ListingSummary>,
    pub cursor: Option<Cursor>,
    pub exhausted: bool,
    pub loading: bool,
    pub mode: QueryMode,
    pub generation: u64,
    /// Message for the error indicator after a failed fetch.
    pub last_error: Option<String>,
}

/// What a fetch did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// First page of a mode; the list was replaced.
    Replaced { count: usize, exhausted: bool },
    /// Next page; results were appended.
    Appended { count: usize, exhausted: bool },
    /// `load_more` while loading, exhausted or before any page.
    Skipped,
    /// The view moved on while the request was in flight.
    Stale,
}

pub struct CollectionBrowser {
    collection: Arc<dyn ListingCollection>,
    state: Mutex<PageState>,
    images: ImageReadinessTracker,
}

impl CollectionBrowser {
    pub fn new(collection: Arc<dyn ListingCollection>) -> Self {
        Self {
            collection,
            state: Mutex::new(PageState::default()),
            images: ImageReadinessTracker::new(),
        }
    }

    /// Browse everything, newest first.
    pub async fn initialize(&self, page_size: usize) -> CatalogResult<FetchOutcome> {
        self.start_mode(QueryMode::Browse, page_size).await
    }

    /// Search by case-insensitive name prefix. A blank term browses.
    pub async fn search(&self, term: &str, page_size: usize) -> CatalogResult<FetchOutcome> {
        self.start_mode(QueryMode::from_term(term), page_size).await
    }

    /// Append the next page of the current mode.
    pub async fn load_more(&self, page_size: usize) -> CatalogResult<FetchOutcome> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize);
        }

        let (generation, query) = {
            let mut state = self.state.lock();
            if state.loading || state.exhausted {
                return Ok(FetchOutcome::Skipped);
            }
            let Some(cursor) = state.cursor.clone() else {
                return Ok(FetchOutcome::Skipped);
            };
            state.loading = true;
            (state.generation, state.mode.page_query(page_size, Some(cursor)))
        };

        tracing::debug!(generation, limit = page_size, "next page requested");
        let result = self.collection.query(query).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::warn!(generation, current = state.generation, "stale page discarded");
            return Ok(FetchOutcome::Stale);
        }
        state.loading = false;

        match result {
            Ok(page) => {
                let count = page.len();
                state.exhausted = count < page_size;
                if let Some(last) = page.last() {
                    state.cursor = Some(Cursor::after(last, state.mode.filter()));
                }
                state.items.extend(page);
                state.last_error = None;
                Ok(FetchOutcome::Appended {
                    count,
                    exhausted: state.exhausted,
                })
            }
            Err(source) => {
                tracing::error!(generation, error = %source, "next page failed");
                state.last_error = Some(source.to_string());
                Err(CatalogError::query(source))
            }
        }
    }

    async fn start_mode(&self, mode: QueryMode, page_size: usize) -> CatalogResult<FetchOutcome> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize);
        }

        let filter = mode.filter();
        let (generation, query) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.mode = mode.clone();
            state.cursor = None;
            state.exhausted = false;
            state.loading = true;
            (state.generation, mode.page_query(page_size, None))
        };

        tracing::info!(generation, ?mode, limit = page_size, "first page requested");
        let result = self.collection.query(query).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::warn!(generation, current = state.generation, "stale first page discarded");
            return Ok(FetchOutcome::Stale);
        }
        state.loading = false;
        self.images.clear();

        match result {
            Ok(page) => {
                let count = page.len();
                state.exhausted = count < page_size;
                state.cursor = page.last().map(|last| Cursor::after(last, filter));
                state.items = page;
                state.last_error = None;
                Ok(FetchOutcome::Replaced {
                    count,
                    exhausted: state.exhausted,
                })
            }
            Err(source) => {
                tracing::error!(generation, error = %source, "first page failed");
                state.items.clear();
                state.cursor = None;
                state.last_error = Some(source.to_string());
                Err(CatalogError::query(source))
            }
        }
    }

    /// One full listing for the detail page.
    pub async fn fetch_detail(&self, id: &ListingId) -> CatalogResult<Listing> {
        tracing::debug!(%id, "detail requested");
        self.collection.get(id).await.map_err(|source| {
            tracing::warn!(%id, error = %source, "detail lookup failed");
            CatalogError::query(source)
        })
    }

    /// Drop the list and ignore any response still in flight.
    pub fn teardown(&self) {
        let mut state = self.state.lock();
        let generation = state.generation + 1;
        *state = PageState {
            generation,
            ..PageState::default()
        };
        self.images.clear();
    }

    pub fn snapshot(&self) -> PageState {
        self.state.lock().clone()
    }

    pub fn items(&self) -> Vec<ListingSummary> {
        self.state.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.lock().exhausted
    }

    pub fn mode(&self) -> QueryMode {
        self.state.lock().mode.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn images(&self) -> &ImageReadinessTracker {
        &self.images
    }
}
