//! Creating listings: photo upload, draft validation and insert.

use std::sync::Arc;

use carhub_auth::SessionUser;
use carhub_blob::{ImageAdapter, ImageUpload};
use carhub_core::{ImageRef, Listing, ListingCollection, ListingId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::draft::{DraftError, ListingDraft};
use crate::error::{CatalogError, CatalogResult};

pub struct ListingPublisher {
    collection: Arc<dyn ListingCollection>,
    images: ImageAdapter,
    last_created: Mutex<Option<DateTime<Utc>>>,
}

impl ListingPublisher {
    pub fn new(collection: Arc<dyn ListingCollection>, images: ImageAdapter) -> Self {
        Self {
            collection,
            images,
            last_created: Mutex::new(None),
        }
    }

    /// Store one photo for `owner` ahead of publishing.
    pub async fn upload_image(&self, owner: &SessionUser, upload: ImageUpload) -> CatalogResult<ImageRef> {
        let image = self
            .images
            .upload(&owner.uid, upload)
            .await
            .map_err(CatalogError::UploadFailure)?;
        tracing::info!(owner = %owner.uid, name = %image.name, "image uploaded");
        Ok(image)
    }

    /// Remove a photo that was uploaded but will not be published.
    pub async fn discard_image(&self, image: &ImageRef) -> CatalogResult<()> {
        self.images.delete(image).await.map_err(|source| {
            let key = self.images.key_of(image);
            tracing::warn!(%key, error = %source, "image discard failed");
            CatalogError::DeleteBlobFailure { key, source }
        })
    }

    /// Validate `draft` and insert it as a new listing owned by `owner`.
    pub async fn publish(
        &self,
        owner: &SessionUser,
        draft: &ListingDraft,
        images: Vec<ImageRef>,
    ) -> CatalogResult<Listing> {
        let draft = draft.checked()?;
        if images.is_empty() {
            return Err(DraftError::field("images", "at least one image is required").into());
        }
        if let Some(foreign) = images.iter().find(|i| i.owner_id != owner.uid) {
            return Err(CatalogError::Forbidden(format!(
                "image {} belongs to another owner",
                foreign.name
            )));
        }

        let listing = Listing {
            id: ListingId::new(),
            name: draft.name.to_uppercase(),
            model: draft.model,
            year: draft.year,
            km: draft.km,
            price: draft.price,
            city: draft.city,
            whatsapp: draft.whatsapp,
            description: draft.description,
            created_at: self.next_created_at(),
            owner_id: owner.uid.clone(),
            owner_name: owner.name.clone(),
            images,
        };

        let stored = self.collection.insert(listing).await.map_err(|source| {
            tracing::error!(owner = %owner.uid, error = %source, "listing insert failed");
            CatalogError::PublishFailure { source }
        })?;
        tracing::info!(id = %stored.id, owner = %owner.uid, "listing published");
        Ok(stored)
    }

    // Strictly increasing so two listings published in the same instant
    // still have a defined newest-first order.
    fn next_created_at(&self) -> DateTime<Utc> {
        let mut last = self.last_created.lock();
        let now = Utc::now();
        let next = match *last {
            Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}
