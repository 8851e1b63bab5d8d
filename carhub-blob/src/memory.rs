use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};

use crate::{BlobError, BlobResult, BlobStore, PutResult};

#[derive(Debug, Clone)]
struct StoredBlob {
    content_type: Option<String>,
    body: Bytes,
}

/// In-memory blob store for tests and local development
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
    failing_deletes: Mutex<HashSet<String>>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("mem://")
    }

    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            blobs: RwLock::new(HashMap::new()),
            failing_deletes: Mutex::new(HashSet::new()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.blobs.read().get(key).and_then(|b| b.content_type.clone())
    }

    /// Make deletes of `key` fail with a backend error
    pub fn fail_deletes_of<S: Into<String>>(&self, key: S) {
        self.failing_deletes.lock().insert(key.into());
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, content_type: Option<&str>, body: Bytes) -> BlobResult<PutResult> {
        if key.trim().is_empty() {
            return Err(BlobError::invalid("blob key must not be empty"));
        }

        let size_bytes = body.len() as u64;
        self.blobs.write().insert(
            key.to_string(),
            StoredBlob {
                content_type: content_type.map(|s| s.to_string()),
                body,
            },
        );

        Ok(PutResult {
            size_bytes,
            etag: None,
        })
    }

    async fn url(&self, key: &str) -> BlobResult<String> {
        if !self.contains(key) {
            return Err(BlobError::not_found(key));
        }
        Ok(format!("{}{}", self.base_url, key))
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        if self.failing_deletes.lock().contains(key) {
            return Err(BlobError::backend_message(format!("storage refused to delete {key}")));
        }

        match self.blobs.write().remove(key) {
            Some(blob) => {
                tracing::trace!(key, size = blob.body.len(), "blob deleted");
                Ok(())
            }
            None => Err(BlobError::not_found(key)),
        }
    }
}
