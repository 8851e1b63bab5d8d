use std::time::Duration;

use carhub_core::{
    CollectionQuery, Cursor, ErrorKind, ImageRef, Listing, ListingCollection, ListingId,
    MemoryCollection, QueryFilter, QueryMode, SnapshotStream, StoreError,
};
use chrono::DateTime;
use futures::StreamExt;

fn listing(id: &str, name: &str, owner: &str, secs: i64) -> Listing {
    Listing {
        id: ListingId::from_string(id),
        name: name.to_string(),
        model: "2.0".to_string(),
        year: "2024/2024".to_string(),
        km: "1000".to_string(),
        price: "100000".to_string(),
        city: "Campo Grande - MS".to_string(),
        whatsapp: "67999999999".to_string(),
        description: "Clean".to_string(),
        created_at: DateTime::from_timestamp(secs, 0).unwrap(),
        owner_id: owner.to_string(),
        owner_name: None,
        images: vec![ImageRef::new(owner, format!("{id}-img"), format!("mem://{id}"))],
    }
}

fn ids(items: &[carhub_core::ListingSummary]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

async fn next_snapshot(stream: &mut SnapshotStream) -> Vec<carhub_core::ListingSummary> {
    tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("Timeout waiting for snapshot")
        .expect("Stream ended")
        .expect("Snapshot error")
}

#[tokio::test]
async fn query_pages_newest_first_and_resumes_after_cursor() {
    let collection = MemoryCollection::with_listings(vec![
        listing("a", "AUDI A3", "u1", 1),
        listing("b", "BMW 320", "u1", 2),
        listing("c", "CHERY TIGGO", "u2", 3),
    ]);

    let first = collection.query(CollectionQuery::new(2)).await.unwrap();
    assert_eq!(ids(&first), vec!["c", "b"]);

    let cursor = Cursor::after(first.last().unwrap(), None);
    let second = collection
        .query(CollectionQuery::new(2).start_after(cursor))
        .await
        .unwrap();
    assert_eq!(ids(&second), vec!["a"]);
}

#[tokio::test]
async fn prefix_filter_matches_upper_cased_names() {
    let collection = MemoryCollection::with_listings(vec![
        listing("h", "HONDA CIVIC", "u1", 1),
        listing("t", "TOYOTA COROLLA", "u1", 2),
    ]);

    let page = collection
        .query(QueryMode::from_term("honda").page_query(10, None))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["h"]);
}

#[tokio::test]
async fn cursor_from_another_filter_is_refused() {
    let collection = MemoryCollection::with_listings(vec![listing("h", "HONDA CIVIC", "u1", 1)]);
    let page = collection.query(CollectionQuery::new(1)).await.unwrap();
    let browse_cursor = Cursor::after(&page[0], None);

    let err = collection
        .query(
            CollectionQuery::new(1)
                .with_filter(QueryFilter::name_prefix("honda"))
                .start_after(browse_cursor),
        )
        .await
        .unwrap_err();

    assert_eq!(StoreError::kind_of(&err), ErrorKind::InvalidCursor);
}

#[tokio::test]
async fn zero_limit_is_a_bad_request() {
    let collection = MemoryCollection::new();
    let err = collection.query(CollectionQuery::new(0)).await.unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::BadRequest);
}

#[tokio::test]
async fn injected_query_failures_are_consumed_in_order() {
    let collection = MemoryCollection::with_listings(vec![listing("a", "AUDI", "u1", 1)]);
    collection.fail_next_queries(1);

    let err = collection.query(CollectionQuery::new(5)).await.unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::Unavailable);
    assert_eq!(collection.query(CollectionQuery::new(5)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn subscription_delivers_full_snapshots_for_its_filter() {
    let collection = MemoryCollection::with_listings(vec![
        listing("a", "AUDI A3", "u1", 1),
        listing("z", "ZOTYE", "u2", 2),
    ]);

    let mut stream = collection
        .subscribe(Some(QueryFilter::owner("u1")))
        .await
        .unwrap();
    assert_eq!(ids(&next_snapshot(&mut stream).await), vec!["a"]);

    collection.insert(listing("b", "BMW 320", "u1", 5)).await.unwrap();
    assert_eq!(ids(&next_snapshot(&mut stream).await), vec!["b", "a"]);

    // A write outside the filter does not produce a snapshot.
    collection.insert(listing("y", "YAMAHA", "u2", 6)).await.unwrap();
    collection.delete(&ListingId::from_string("a")).await.unwrap();
    assert_eq!(ids(&next_snapshot(&mut stream).await), vec!["b"]);
}

#[tokio::test]
async fn lost_listeners_report_unavailable_and_end() {
    let collection = MemoryCollection::with_listings(vec![listing("a", "AUDI A3", "u1", 1)]);
    let mut stream = collection.subscribe(None).await.unwrap();
    assert_eq!(ids(&next_snapshot(&mut stream).await), vec!["a"]);

    collection.fail_listeners();
    let err = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("Timeout waiting for listener error")
        .expect("Stream ended")
        .unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::Unavailable);
    assert!(stream.next().await.is_none());

    // Listeners attached afterwards are unaffected.
    let mut stream = collection.subscribe(None).await.unwrap();
    assert_eq!(ids(&next_snapshot(&mut stream).await), vec!["a"]);
}

#[tokio::test]
async fn get_insert_and_delete_report_structured_errors() {
    let collection = MemoryCollection::new();
    let id = ListingId::from_string("a");

    let err = collection.get(&id).await.unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::NotFound);

    collection.insert(listing("a", "AUDI", "u1", 1)).await.unwrap();
    let err = collection.insert(listing("a", "AUDI", "u1", 1)).await.unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::Conflict);
    assert_eq!(collection.get(&id).await.unwrap().name, "AUDI");

    collection.fail_deletes_of(id.clone());
    assert!(collection.delete(&id).await.is_err());
    assert!(collection.contains(&id));

    collection.clear_faults();
    collection.delete(&id).await.unwrap();
    assert!(collection.is_empty());
    let err = collection.delete(&id).await.unwrap_err();
    assert_eq!(StoreError::kind_of(&err), ErrorKind::NotFound);
}
