use std::sync::Arc;

use carhub_auth::SessionUser;
use carhub_blob::{BlobError, ImageAdapter, ImageRules, ImageUpload, MemoryBlobStore};
use carhub_catalog::{CatalogError, CollectionBrowser, ListingDraft, ListingPublisher};
use carhub_core::testing::init_tracing;
use carhub_core::{ImageRef, ListingCollection, MemoryCollection};

struct Harness {
    collection: Arc<MemoryCollection>,
    store: Arc<MemoryBlobStore>,
    publisher: ListingPublisher,
}

fn harness() -> Harness {
    init_tracing();
    let collection = Arc::new(MemoryCollection::new());
    let store = Arc::new(MemoryBlobStore::new());
    let images = ImageAdapter::new(store.clone(), ImageRules::default());
    let publisher = ListingPublisher::new(collection.clone(), images);
    Harness {
        collection,
        store,
        publisher,
    }
}

fn owner() -> SessionUser {
    SessionUser {
        uid: "uid-ana".to_string(),
        name: Some("Ana".to_string()),
        email: Some("ana@example.com".to_string()),
    }
}

fn draft(name: &str) -> ListingDraft {
    ListingDraft {
        name: name.to_string(),
        model: "EXL 2.0".to_string(),
        year: "2024/2024".to_string(),
        km: "23000".to_string(),
        price: "190000".to_string(),
        city: "Campo Grande - MS".to_string(),
        whatsapp: "67 999991111".to_string(),
        description: "Garage kept.".to_string(),
    }
}

fn key_of(image: &ImageRef) -> String {
    format!("images/{}/{}", image.owner_id, image.name)
}

#[tokio::test]
async fn uploaded_images_are_stored_under_the_owner() {
    let h = harness();

    let image = h
        .publisher
        .upload_image(&owner(), ImageUpload::new("image/jpeg", vec![1u8; 64]))
        .await
        .unwrap();

    assert_eq!(image.owner_id, "uid-ana");
    assert_eq!(image.url, format!("mem://{}", key_of(&image)));
    assert!(h.store.contains(&key_of(&image)));
}

#[tokio::test]
async fn unsupported_image_types_are_refused() {
    let h = harness();

    let err = h
        .publisher
        .upload_image(&owner(), ImageUpload::new("image/gif", vec![1u8; 8]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::UploadFailure(BlobError::UnsupportedContentType { .. })
    ));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn discarded_images_are_deleted() {
    let h = harness();
    let image = h
        .publisher
        .upload_image(&owner(), ImageUpload::new("image/png", vec![1u8; 8]))
        .await
        .unwrap();

    h.publisher.discard_image(&image).await.unwrap();
    assert!(h.store.is_empty());

    let err = h.publisher.discard_image(&image).await.unwrap_err();
    assert!(matches!(err, CatalogError::DeleteBlobFailure { .. }));
}

#[tokio::test]
async fn publish_stores_an_upper_cased_listing() {
    let h = harness();
    let image = h
        .publisher
        .upload_image(&owner(), ImageUpload::new("image/png", vec![1u8; 8]))
        .await
        .unwrap();

    let listing = h
        .publisher
        .publish(&owner(), &draft("  Honda Civic "), vec![image.clone()])
        .await
        .unwrap();

    assert_eq!(listing.name, "HONDA CIVIC");
    assert_eq!(listing.owner_id, "uid-ana");
    assert_eq!(listing.owner_name.as_deref(), Some("Ana"));
    assert_eq!(listing.images, vec![image]);

    let stored = h.collection.get(&listing.id).await.unwrap();
    assert_eq!(stored, listing);
}

#[tokio::test]
async fn published_listings_are_searchable_newest_first() {
    let h = harness();
    let image = h
        .publisher
        .upload_image(&owner(), ImageUpload::new("image/png", vec![1u8; 8]))
        .await
        .unwrap();

    let first = h
        .publisher
        .publish(&owner(), &draft("Honda Civic"), vec![image.clone()])
        .await
        .unwrap();
    let second = h
        .publisher
        .publish(&owner(), &draft("honda fit"), vec![image])
        .await
        .unwrap();
    assert!(second.created_at > first.created_at);

    let browser = CollectionBrowser::new(h.collection.clone());
    browser.search("Hon", 10).await.unwrap();
    let names: Vec<String> = browser.items().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["HONDA FIT", "HONDA CIVIC"]);
}

#[tokio::test]
async fn publish_requires_an_image() {
    let h = harness();

    let err = h
        .publisher
        .publish(&owner(), &draft("Honda Civic"), Vec::new())
        .await
        .unwrap_err();

    match err {
        CatalogError::Draft(draft) => assert!(draft.has_field("images")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.collection.is_empty());
}

#[tokio::test]
async fn invalid_drafts_are_not_inserted() {
    let h = harness();
    let image = ImageRef::new("uid-ana", "img", "mem://images/uid-ana/img");
    let mut bad = draft("Honda Civic");
    bad.whatsapp = "call me".to_string();
    bad.price = " ".to_string();

    let err = h
        .publisher
        .publish(&owner(), &bad, vec![image])
        .await
        .unwrap_err();

    match err {
        CatalogError::Draft(draft) => {
            assert!(draft.has_field("whatsapp"));
            assert!(draft.has_field("price"));
            assert!(!draft.has_field("name"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.collection.is_empty());
}

#[tokio::test]
async fn images_of_another_owner_are_refused() {
    let h = harness();
    let foreign = ImageRef::new("uid-bruno", "img", "mem://images/uid-bruno/img");

    let err = h
        .publisher
        .publish(&owner(), &draft("Honda Civic"), vec![foreign])
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Forbidden(_)));
    assert!(h.collection.is_empty());
}
