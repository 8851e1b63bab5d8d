//! # carhub-blob: listing photo storage
//!
//! `carhub-blob` stores listing photos in a hosted blob store and hands back
//! [`ImageRef`](carhub_core::ImageRef)s the catalog can render.
//!
//! ```text
//! ┌─────────────────┐
//! │   Publisher /   │  ← listing workflows
//! │   Dashboard     │
//! ├─────────────────┤
//! │  ImageAdapter   │  ← rules + key layout (images/{owner}/{name})
//! ├─────────────────┤
//! │   BlobStore     │  ← storage primitives
//! └─────────────────┘
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//! use carhub_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let adapter = ImageAdapter::new(Arc::new(MemoryBlobStore::new()), ImageRules::default());
//! let image = adapter
//!     .upload("uid-1", ImageUpload::new("image/png", vec![0u8; 16]))
//!     .await?;
//! assert!(image.url.starts_with("mem://images/uid-1/"));
//! adapter.delete(&image).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
mod config;
mod error;
mod memory;
pub mod store;
mod types;

pub use adapter::ImageAdapter;
pub use config::ImageRules;
pub use error::{BlobError, BlobResult};
pub use memory::MemoryBlobStore;
pub use store::{BlobKeyStrategy, BlobStore, ImageKeys, PutResult};
pub use types::{new_image_name, ImageUpload};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobError, BlobResult, BlobStore, ImageAdapter, ImageRules, ImageUpload, MemoryBlobStore,
    };
}
