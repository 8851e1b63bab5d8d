use async_trait::async_trait;
use bytes::Bytes;

use crate::BlobResult;

/// Core blob storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob under `key`
    async fn put(&self, key: &str, content_type: Option<&str>, body: Bytes) -> BlobResult<PutResult>;

    /// Resolve a URL the UI can fetch the blob from
    async fn url(&self, key: &str) -> BlobResult<String>;

    /// Delete a blob
    async fn delete(&self, key: &str) -> BlobResult<()>;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub size_bytes: u64,
    pub etag: Option<String>,
}

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Key of a listing photo
    fn image_key(&self, owner_id: &str, name: &str) -> String;
}

/// Default key strategy: images/{owner}/{name}
#[derive(Debug, Clone)]
pub struct ImageKeys;

impl BlobKeyStrategy for ImageKeys {
    fn image_key(&self, owner_id: &str, name: &str) -> String {
        format!("images/{}/{}", owner_id, name)
    }
}
