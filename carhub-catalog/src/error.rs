use carhub_blob::BlobError;
use carhub_core::{ErrorKind, ListingId, StoreError};
use thiserror::Error;

use crate::draft::DraftError;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Everything a catalog view can report to the user.
///
/// None of these are fatal; each is recovered by re-invoking the operation
/// that produced it.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Query failed ({}): {source}", .kind.class_name())]
    QueryFailure {
        kind: ErrorKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not delete listing {id}: {source}")]
    DeleteRecordFailure {
        id: ListingId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not delete image {key}: {source}")]
    DeleteBlobFailure {
        key: String,
        #[source]
        source: BlobError,
    },

    #[error("Could not attach listing listener: {source}")]
    SubscriptionFailure {
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not upload image: {0}")]
    UploadFailure(#[source] BlobError),

    #[error("Could not publish listing: {source}")]
    PublishFailure {
        #[source]
        source: anyhow::Error,
    },

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl CatalogError {
    pub(crate) fn query(source: anyhow::Error) -> Self {
        CatalogError::QueryFailure {
            kind: StoreError::kind_of(&source),
            source,
        }
    }

    /// Backend error kind, for failures that came from the collection.
    pub fn store_kind(&self) -> Option<ErrorKind> {
        match self {
            CatalogError::QueryFailure { kind, .. } => Some(*kind),
            CatalogError::DeleteRecordFailure { source, .. }
            | CatalogError::SubscriptionFailure { source }
            | CatalogError::PublishFailure { source } => Some(StoreError::kind_of(source)),
            _ => None,
        }
    }
}
