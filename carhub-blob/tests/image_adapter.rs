use std::sync::Arc;

use carhub_blob::{BlobError, ImageAdapter, ImageRules, ImageUpload, MemoryBlobStore};

fn adapter_with_store() -> (ImageAdapter, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new());
    let adapter = ImageAdapter::new(store.clone(), ImageRules::default());
    (adapter, store)
}

#[tokio::test]
async fn uploads_land_under_the_owner_prefix() {
    let (adapter, store) = adapter_with_store();

    let image = adapter
        .upload("uid-1", ImageUpload::new("image/jpeg", vec![1u8, 2, 3]).with_filename("civic.jpg"))
        .await
        .unwrap();

    let key = adapter.key_of(&image);
    assert_eq!(key, format!("images/uid-1/{}", image.name));
    assert_eq!(image.owner_id, "uid-1");
    assert_eq!(image.url, format!("mem://{key}"));
    assert_eq!(store.content_type(&key).as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn every_upload_gets_a_unique_name() {
    let (adapter, store) = adapter_with_store();

    let a = adapter.upload("uid-1", ImageUpload::new("image/png", vec![0u8])).await.unwrap();
    let b = adapter.upload("uid-1", ImageUpload::new("image/png", vec![0u8])).await.unwrap();

    assert_ne!(a.name, b.name);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn rejects_non_image_content_types() {
    let (adapter, store) = adapter_with_store();

    let err = adapter
        .upload("uid-1", ImageUpload::new("image/gif", vec![0u8]))
        .await
        .unwrap_err();

    assert!(matches!(err, BlobError::UnsupportedContentType { ref content_type } if content_type == "image/gif"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn rejects_oversized_images() {
    let store = Arc::new(MemoryBlobStore::new());
    let adapter = ImageAdapter::new(store.clone(), ImageRules::new().with_max_image_bytes(4));

    let err = adapter
        .upload("uid-1", ImageUpload::new("image/png", vec![0u8; 5]))
        .await
        .unwrap_err();

    assert!(matches!(err, BlobError::TooLarge { size: 5, max: 4 }));
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_removes_the_blob_and_reports_missing_ones() {
    let (adapter, store) = adapter_with_store();
    let image = adapter.upload("uid-1", ImageUpload::new("image/png", vec![0u8])).await.unwrap();

    adapter.delete(&image).await.unwrap();
    assert!(store.is_empty());

    let err = adapter.delete(&image).await.unwrap_err();
    assert!(matches!(err, BlobError::NotFound { .. }));
}

#[tokio::test]
async fn injected_delete_failures_surface_as_backend_errors() {
    let (adapter, store) = adapter_with_store();
    let image = adapter.upload("uid-1", ImageUpload::new("image/png", vec![0u8])).await.unwrap();
    store.fail_deletes_of(adapter.key_of(&image));

    let err = adapter.delete(&image).await.unwrap_err();
    assert!(matches!(err, BlobError::Backend { .. }));
    assert!(store.contains(&adapter.key_of(&image)));
}
