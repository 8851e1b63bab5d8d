use std::pin::Pin;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_core::Stream;

use crate::listing::{Listing, ListingId, ListingSummary};
use crate::query::{CollectionQuery, QueryFilter};

/// Live feed of full result sets for one filter.
///
/// Every item is the complete current result set (newest first), not a
/// diff. Dropping the stream releases the listener.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<Vec<ListingSummary>>> + Send>>;

/// The hosted document collection holding listings.
///
/// - `query`     → one newest-first page, optionally filtered and resumed
/// - `subscribe` → standing listener delivering full snapshots
/// - `get`       → one full document
/// - `insert`    → store a new document
/// - `delete`    → remove a document by id
///
/// `get` and `insert` have default implementations that return
/// "Method not implemented" so read-only or test backends can skip them.
#[async_trait]
pub trait ListingCollection: Send + Sync {
    /// Fetch one page.
    ///
    /// Backends must refuse a `start_after` cursor whose filter differs from
    /// `query.filter` with an `InvalidCursor` store error.
    async fn query(&self, query: CollectionQuery) -> Result<Vec<ListingSummary>>;

    /// Attach a standing listener. The first item is the current result set.
    async fn subscribe(&self, filter: Option<QueryFilter>) -> Result<SnapshotStream>;

    /// Delete a record by id.
    async fn delete(&self, id: &ListingId) -> Result<()>;

    /// Fetch one full document by id.
    async fn get(&self, _id: &ListingId) -> Result<Listing> {
        Err(anyhow!("Method not implemented: get"))
    }

    /// Store a new document.
    async fn insert(&self, _listing: Listing) -> Result<Listing> {
        Err(anyhow!("Method not implemented: insert"))
    }
}
