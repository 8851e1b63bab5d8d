use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::collection::{ListingCollection, SnapshotStream};
use crate::errors::StoreError;
use crate::listing::{Listing, ListingId, ListingSummary};
use crate::query::{sort_for_display, CollectionQuery, QueryFilter, SortKey};

type Documents = HashMap<ListingId, Listing>;

#[derive(Debug, Clone, Copy)]
enum Change {
    Write,
    // Every open listener fails and ends.
    ListenerLost,
}

/// Failures to inject, consumed in order. Test and demo use only.
#[derive(Debug, Default)]
struct Faults {
    queries: usize,
    subscribes: usize,
    deletes: HashSet<ListingId>,
}

/// In-memory collection for tests and local development.
///
/// Listeners are fed from a change broadcast: after every write each
/// listener re-runs its filter and yields the new result set if it changed.
pub struct MemoryCollection {
    docs: Arc<RwLock<Documents>>,
    changes: broadcast::Sender<Change>,
    faults: Mutex<Faults>,
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(256);
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            changes,
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Seed documents without going through `insert`.
    pub fn with_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let collection = Self::new();
        {
            let mut docs = collection.docs.write();
            for listing in listings {
                docs.insert(listing.id.clone(), listing);
            }
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    pub fn contains(&self, id: &ListingId) -> bool {
        self.docs.read().contains_key(id)
    }

    /// Make the next `n` queries fail with `Unavailable`.
    pub fn fail_next_queries(&self, n: usize) {
        self.faults.lock().queries = n;
    }

    /// Make the next `n` subscribe calls fail with `Unavailable`.
    pub fn fail_next_subscribes(&self, n: usize) {
        self.faults.lock().subscribes = n;
    }

    /// Make deletes of `id` fail with `Unavailable` until cleared.
    pub fn fail_deletes_of(&self, id: ListingId) {
        self.faults.lock().deletes.insert(id);
    }

    /// Make every listener attached so far yield an `Unavailable` error
    /// and end.
    pub fn fail_listeners(&self) {
        let _ = self.changes.send(Change::ListenerLost);
    }

    pub fn clear_faults(&self) {
        *self.faults.lock() = Faults::default();
    }

    fn take_query_fault(&self) -> bool {
        let mut faults = self.faults.lock();
        if faults.queries > 0 {
            faults.queries -= 1;
            return true;
        }
        false
    }

    fn take_subscribe_fault(&self) -> bool {
        let mut faults = self.faults.lock();
        if faults.subscribes > 0 {
            faults.subscribes -= 1;
            return true;
        }
        false
    }

    fn notify(&self) {
        // No receivers is fine: nobody is subscribed.
        let _ = self.changes.send(Change::Write);
    }
}

fn snapshot(docs: &RwLock<Documents>, filter: Option<&QueryFilter>) -> Vec<ListingSummary> {
    let docs = docs.read();
    let mut items: Vec<ListingSummary> = docs
        .values()
        .map(Listing::summary)
        .filter(|s| filter.map_or(true, |f| f.matches(s)))
        .collect();
    sort_for_display(&mut items);
    items
}

#[async_trait]
impl ListingCollection for MemoryCollection {
    async fn query(&self, query: CollectionQuery) -> Result<Vec<ListingSummary>> {
        if self.take_query_fault() {
            return Err(StoreError::unavailable("collection unavailable").into_anyhow());
        }
        if query.limit == 0 {
            return Err(StoreError::bad_request("limit must be greater than zero").into_anyhow());
        }
        if !query.cursor_matches_filter() {
            return Err(StoreError::invalid_cursor("cursor was produced under a different filter").into_anyhow());
        }

        let items = snapshot(&self.docs, query.filter.as_ref());
        let page = match &query.start_after {
            Some(cursor) => items
                .into_iter()
                .filter(|item| SortKey::of(item).comes_after(cursor.position()))
                .take(query.limit)
                .collect(),
            None => items.into_iter().take(query.limit).collect(),
        };
        Ok(page)
    }

    async fn subscribe(&self, filter: Option<QueryFilter>) -> Result<SnapshotStream> {
        if self.take_subscribe_fault() {
            return Err(StoreError::unavailable("listener could not be attached").into_anyhow());
        }

        // Subscribe before the first snapshot so no write slips between them.
        let mut rx = self.changes.subscribe();
        let docs = Arc::clone(&self.docs);

        let stream = async_stream::stream! {
            let mut last = snapshot(&docs, filter.as_ref());
            yield Ok(last.clone());

            loop {
                match rx.recv().await {
                    Ok(Change::ListenerLost) => {
                        yield Err(StoreError::unavailable("listener lost").into_anyhow());
                        break;
                    }
                    Ok(Change::Write) | Err(RecvError::Lagged(_)) => {
                        let current = snapshot(&docs, filter.as_ref());
                        if current != last {
                            last = current.clone();
                            yield Ok(current);
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Ok(Box::pin(stream))
    }

    async fn delete(&self, id: &ListingId) -> Result<()> {
        if self.faults.lock().deletes.contains(id) {
            return Err(StoreError::unavailable(format!("could not delete listing {id}")).into_anyhow());
        }

        let removed = self.docs.write().remove(id);
        match removed {
            Some(_) => {
                self.notify();
                Ok(())
            }
            None => Err(StoreError::not_found(format!("Listing not found: {id}")).into_anyhow()),
        }
    }

    async fn get(&self, id: &ListingId) -> Result<Listing> {
        self.docs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("Listing not found: {id}")).into_anyhow())
    }

    async fn insert(&self, listing: Listing) -> Result<Listing> {
        {
            let mut docs = self.docs.write();
            if docs.contains_key(&listing.id) {
                return Err(StoreError::conflict(format!("Listing already exists: {}", listing.id)).into_anyhow());
            }
            docs.insert(listing.id.clone(), listing.clone());
        }
        self.notify();
        Ok(listing)
    }
}
