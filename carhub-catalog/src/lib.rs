//! # carhub-catalog: the views over the listing collection
//!
//! - [`CollectionBrowser`]: public catalog, cursor-paged browse and
//!   name-prefix search, newest first.
//! - [`CollectionMirror`] / [`OwnerDashboard`]: live list of the signed-in
//!   owner's listings, with cascading delete.
//! - [`ListingPublisher`]: photo upload and listing creation.
//!
//! ```rust
//! use std::sync::Arc;
//! use carhub_catalog::{CollectionBrowser, FetchOutcome};
//! use carhub_core::MemoryCollection;
//!
//! # #[tokio::main]
//! # async fn main() -> carhub_catalog::CatalogResult<()> {
//! let browser = CollectionBrowser::new(Arc::new(MemoryCollection::new()));
//! let outcome = browser.initialize(12).await?;
//! assert_eq!(outcome, FetchOutcome::Replaced { count: 0, exhausted: true });
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod images;
pub mod mirror;
pub mod publisher;
pub mod settings;

pub use browser::{CollectionBrowser, FetchOutcome, PageState};
pub use dashboard::OwnerDashboard;
pub use draft::{DraftError, ListingDraft};
pub use error::{CatalogError, CatalogResult};
pub use images::ImageReadinessTracker;
pub use mirror::{CollectionMirror, DeleteReport, MirrorState};
pub use publisher::ListingPublisher;
pub use settings::{CatalogSettings, DEFAULT_PAGE_SIZE};
