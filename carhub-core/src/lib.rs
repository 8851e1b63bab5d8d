//! carhub-core: listing types, query building and the collection seam.
//!
//! Everything the catalog views need to talk to a hosted document
//! collection without depending on any particular SDK.

pub mod collection;
pub mod config;
pub mod errors;
pub mod listing;
pub mod query;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "testing")]
pub mod testing;

pub use collection::{ListingCollection, SnapshotStream};
pub use config::{CarHubConfig, CarHubConfigSnapshot, ENV_PREFIX};
pub use errors::{ErrorKind, StoreError, StoreResult};
pub use listing::{ImageRef, Listing, ListingId, ListingSummary};
pub use query::{
    sort_for_display, CollectionQuery, Cursor, NameRange, QueryFilter, QueryMode, SortKey,
    MAX_SENTINEL,
};

#[cfg(feature = "memory")]
pub use memory::MemoryCollection;
