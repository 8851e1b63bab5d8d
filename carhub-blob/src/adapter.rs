use std::sync::Arc;

use carhub_core::ImageRef;

use crate::{
    new_image_name, BlobError, BlobKeyStrategy, BlobResult, BlobStore, ImageKeys, ImageRules,
    ImageUpload,
};

/// Listing-photo operations on top of a [`BlobStore`].
///
/// This is what the publisher and the dashboard embed; it owns the key
/// layout and the upload rules so callers only deal in [`ImageRef`]s.
#[derive(Clone)]
pub struct ImageAdapter {
    store: Arc<dyn BlobStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    rules: ImageRules,
}

impl ImageAdapter {
    /// Create a new image adapter
    pub fn new(store: Arc<dyn BlobStore>, rules: ImageRules) -> Self {
        Self {
            store,
            keys: Arc::new(ImageKeys),
            rules,
        }
    }

    /// Create with custom key strategy
    pub fn with_key_strategy<K: BlobKeyStrategy + 'static>(
        store: Arc<dyn BlobStore>,
        keys: K,
        rules: ImageRules,
    ) -> Self {
        Self {
            store,
            keys: Arc::new(keys),
            rules,
        }
    }

    pub fn rules(&self) -> &ImageRules {
        &self.rules
    }

    /// Store key of an image
    pub fn key_of(&self, image: &ImageRef) -> String {
        self.keys.image_key(&image.owner_id, &image.name)
    }

    /// Validate and store a photo for `owner_id`, returning its reference
    pub async fn upload(&self, owner_id: &str, upload: ImageUpload) -> BlobResult<ImageRef> {
        if owner_id.trim().is_empty() {
            return Err(BlobError::invalid("owner id must not be empty"));
        }
        if !self.rules.accepts(&upload.content_type) {
            return Err(BlobError::UnsupportedContentType {
                content_type: upload.content_type,
            });
        }
        let size = upload.size_bytes();
        if size > self.rules.max_image_bytes {
            return Err(BlobError::TooLarge {
                size,
                max: self.rules.max_image_bytes,
            });
        }

        let name = new_image_name();
        let key = self.keys.image_key(owner_id, &name);
        let result = self
            .store
            .put(&key, Some(&upload.content_type), upload.body)
            .await?;
        let url = self.store.url(&key).await?;

        tracing::debug!(%key, size = result.size_bytes, "image uploaded");
        Ok(ImageRef::new(owner_id, name, url))
    }

    /// Delete a stored photo
    pub async fn delete(&self, image: &ImageRef) -> BlobResult<()> {
        let key = self.key_of(image);
        self.store.delete(&key).await
    }
}
